//! Query patterns over the grant indexes.
//!
//! A query names an owner and/or a grantee, and optionally a data id. The
//! engine enumerates one index set and membership-tests the others, so the
//! cost tracks the size of the chosen primary set rather than the total
//! number of grants in the registry.

use grant_registry_core::{GrantId, Identity, WILDCARD_DATA_ID};

use crate::error::{RegistryError, Result};
use crate::index::GrantIndexes;

/// A grant lookup pattern.
///
/// At least one of `owner` / `grantee` must be present; a data-id-only
/// pattern has no caller-scoped index to enumerate and is rejected. A
/// `data_id` of `"*"` matches any data id, same as leaving it out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantQuery {
    pub owner: Option<Identity>,
    pub grantee: Option<Identity>,
    pub data_id: Option<String>,
}

impl GrantQuery {
    /// Create an empty pattern; chain the builder methods to constrain it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to grants created by `owner`.
    pub fn owner(mut self, owner: Identity) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Restrict to grants naming `grantee`.
    pub fn grantee(mut self, grantee: Identity) -> Self {
        self.grantee = Some(grantee);
        self
    }

    /// Restrict to grants covering `data_id` (`"*"` matches any).
    pub fn data_id(mut self, data_id: impl Into<String>) -> Self {
        self.data_id = Some(data_id.into());
        self
    }

    /// Reject unsupported patterns.
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_none() && self.grantee.is_none() {
            return Err(RegistryError::InvalidQuery);
        }
        Ok(())
    }

    /// The data-id term, with the wildcard normalized away.
    fn data_id_filter(&self) -> Option<&str> {
        match self.data_id.as_deref() {
            None | Some(WILDCARD_DATA_ID) => None,
            Some(data_id) => Some(data_id),
        }
    }
}

/// Resolve a query to the matching grant ids, sorted for determinism.
pub(crate) fn resolve(indexes: &GrantIndexes, query: &GrantQuery) -> Result<Vec<GrantId>> {
    query.validate()?;

    // Enumerate the owner set when an owner is given, else the grantee set.
    let primary = match (&query.owner, &query.grantee) {
        (Some(owner), _) => indexes.owner_set(owner),
        (None, Some(grantee)) => indexes.grantee_set(grantee),
        (None, None) => unreachable!("validate rejects empty patterns"),
    };
    let Some(primary) = primary else {
        return Ok(Vec::new());
    };

    // Membership predicates for the terms not chosen as the enumeration
    // source. A provided term whose key is unknown can match nothing.
    let grantee_set = match (&query.owner, &query.grantee) {
        (Some(_), Some(grantee)) => match indexes.grantee_set(grantee) {
            Some(set) => Some(set),
            None => return Ok(Vec::new()),
        },
        _ => None,
    };
    let data_id_set = match query.data_id_filter() {
        Some(data_id) => match indexes.data_id_set(data_id) {
            Some(set) => Some(set),
            None => return Ok(Vec::new()),
        },
        None => None,
    };

    let mut ids: Vec<GrantId> = primary
        .iter()
        .filter(|id| grantee_set.map_or(true, |set| set.contains(id)))
        .filter(|id| data_id_set.map_or(true, |set| set.contains(id)))
        .copied()
        .collect();
    ids.sort_unstable();
    Ok(ids)
}
