//! Secondary indexes over the grant store.
//!
//! Three independent mappings, each from a key to a set of grant ids. An id
//! appears in exactly the owner-set, grantee-set, and data-id-set matching
//! its grant's fields, for as long as the store holds the record. The
//! registry mutates store and indexes together under one guard; nothing
//! else writes to either.

use std::collections::{HashMap, HashSet};

use grant_registry_core::{Grant, GrantId, Identity};

/// The three secondary indexes.
///
/// Sets have no iteration-order guarantee; callers needing a stable order
/// sort the resolved ids themselves.
#[derive(Debug, Default)]
pub struct GrantIndexes {
    by_owner: HashMap<Identity, HashSet<GrantId>>,
    by_grantee: HashMap<Identity, HashSet<GrantId>>,
    by_data_id: HashMap<String, HashSet<GrantId>>,
}

impl GrantIndexes {
    /// Create empty indexes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the indexes from a full store scan.
    pub fn rebuild(records: &[(GrantId, Grant)]) -> Self {
        let mut indexes = Self::default();
        for (id, grant) in records {
            indexes.insert(grant, *id);
        }
        indexes
    }

    /// Add `id` to the three sets keyed by the grant's fields, creating
    /// empty sets on first use.
    pub fn insert(&mut self, grant: &Grant, id: GrantId) {
        self.by_owner.entry(grant.owner).or_default().insert(id);
        self.by_grantee.entry(grant.grantee).or_default().insert(id);
        self.by_data_id
            .entry(grant.data_id.clone())
            .or_default()
            .insert(id);
    }

    /// Remove `id` from the three sets keyed by the grant's fields.
    ///
    /// Sets that become empty are discarded; readers cannot tell an empty
    /// set from a missing one.
    pub fn remove(&mut self, grant: &Grant, id: &GrantId) {
        remove_entry(&mut self.by_owner, &grant.owner, id);
        remove_entry(&mut self.by_grantee, &grant.grantee, id);
        remove_entry(&mut self.by_data_id, &grant.data_id, id);
    }

    /// Ids of grants created by `owner`. Unknown keys read as empty.
    pub fn owner_set(&self, owner: &Identity) -> Option<&HashSet<GrantId>> {
        self.by_owner.get(owner)
    }

    /// Ids of grants naming `grantee`. Unknown keys read as empty.
    pub fn grantee_set(&self, grantee: &Identity) -> Option<&HashSet<GrantId>> {
        self.by_grantee.get(grantee)
    }

    /// Ids of grants covering `data_id`. Unknown keys read as empty.
    pub fn data_id_set(&self, data_id: &str) -> Option<&HashSet<GrantId>> {
        self.by_data_id.get(data_id)
    }

    /// Check index consistency against the full set of stored records.
    ///
    /// Verifies that every stored key re-derives from its record's fields,
    /// that each id sits in exactly the three matching sets, and that no
    /// set member lacks a stored record.
    pub fn verify(&self, records: &[(GrantId, Grant)]) -> std::result::Result<(), String> {
        let by_id: HashMap<&GrantId, &Grant> = records.iter().map(|(id, g)| (id, g)).collect();

        for (id, grant) in records {
            if grant.compute_id() != *id {
                return Err(format!("grant {} does not re-derive from its fields", id));
            }
            if !self.owner_set(&grant.owner).is_some_and(|s| s.contains(id)) {
                return Err(format!("grant {} missing from its owner set", id));
            }
            if !self
                .grantee_set(&grant.grantee)
                .is_some_and(|s| s.contains(id))
            {
                return Err(format!("grant {} missing from its grantee set", id));
            }
            if !self
                .data_id_set(&grant.data_id)
                .is_some_and(|s| s.contains(id))
            {
                return Err(format!("grant {} missing from its data-id set", id));
            }
        }

        for (owner, set) in &self.by_owner {
            for id in set {
                match by_id.get(id) {
                    Some(grant) if grant.owner == *owner => {}
                    Some(_) => return Err(format!("grant {} indexed under wrong owner", id)),
                    None => return Err(format!("owner set references missing grant {}", id)),
                }
            }
        }
        for (grantee, set) in &self.by_grantee {
            for id in set {
                match by_id.get(id) {
                    Some(grant) if grant.grantee == *grantee => {}
                    Some(_) => return Err(format!("grant {} indexed under wrong grantee", id)),
                    None => return Err(format!("grantee set references missing grant {}", id)),
                }
            }
        }
        for (data_id, set) in &self.by_data_id {
            for id in set {
                match by_id.get(id) {
                    Some(grant) if grant.data_id == *data_id => {}
                    Some(_) => return Err(format!("grant {} indexed under wrong data id", id)),
                    None => return Err(format!("data-id set references missing grant {}", id)),
                }
            }
        }

        Ok(())
    }
}

fn remove_entry<K: Eq + std::hash::Hash>(
    map: &mut HashMap<K, HashSet<GrantId>>,
    key: &K,
    id: &GrantId,
) {
    if let Some(set) = map.get_mut(key) {
        set.remove(id);
        if set.is_empty() {
            map.remove(key);
        }
    }
}
