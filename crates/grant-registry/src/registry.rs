//! The Registry: grant storage, indexing, and atomic mutations.
//!
//! The registry executes as a sequentially-consistent state machine. Every
//! mutation validates all of its preconditions before the first write and
//! holds the index write guard for the whole call, so queries never observe
//! a store/index split and a bulk delete is all-or-nothing.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use grant_registry_core::{Grant, GrantId, Identity, Timestamp};
use grant_registry_store::{GrantStore, MemoryStore};

use crate::error::{RegistryError, Result};
use crate::index::GrantIndexes;
use crate::query::{self, GrantQuery};

/// Configuration for the Registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Whether to verify store/index consistency when opening.
    pub verify_on_open: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            verify_on_open: true,
        }
    }
}

/// The grant registry.
///
/// Owns the canonical record store and the three secondary indexes, and is
/// the only component that mutates either. Time is always an argument:
/// the registry reads no clock of its own.
#[derive(Debug)]
pub struct Registry<S: GrantStore> {
    store: Arc<S>,
    indexes: RwLock<GrantIndexes>,
}

impl Registry<MemoryStore> {
    /// Create an empty registry over an in-memory store.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            indexes: RwLock::new(GrantIndexes::new()),
        }
    }
}

impl<S: GrantStore> Registry<S> {
    /// Open a registry over `store`.
    ///
    /// Secondary indexes are not persisted; they are rebuilt here from a
    /// full scan, optionally verifying that every record's key re-derives
    /// from its fields.
    pub async fn open(store: S, config: RegistryConfig) -> Result<Self> {
        let records = store.scan_all().await?;
        let indexes = GrantIndexes::rebuild(&records);
        if config.verify_on_open {
            indexes
                .verify(&records)
                .map_err(RegistryError::Inconsistent)?;
        }
        Ok(Self {
            store: Arc::new(store),
            indexes: RwLock::new(indexes),
        })
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a grant on behalf of `caller`.
    ///
    /// The owner is always the authenticated caller, never a parameter.
    /// Fails with [`RegistryError::DuplicateGrant`] when the exact record
    /// (all four fields equal) already exists.
    pub async fn insert_grant(
        &self,
        caller: &Identity,
        grantee: &Identity,
        data_id: &str,
        locked_until: Option<Timestamp>,
    ) -> Result<GrantId> {
        let grant = Grant::new(*caller, *grantee, data_id, locked_until.unwrap_or(0));
        let id = grant.compute_id();

        let mut indexes = self.indexes.write().await;

        if self.store.contains(&id).await? {
            return Err(RegistryError::DuplicateGrant(id));
        }

        self.store.put(&id, &grant).await?;
        indexes.insert(&grant, id);

        info!(
            event = "grant_inserted",
            owner = %grant.owner,
            grantee = %grant.grantee,
            data_id = %grant.data_id,
            locked_until = grant.locked_until,
            id = %id,
        );

        Ok(id)
    }

    /// Delete grants owned by `caller` matching `grantee` and `data_id`.
    ///
    /// `locked_until` narrows the candidates to an exact lock value; both
    /// `None` and `Some(0)` mean "no filter". `now` is the environment's
    /// current time.
    ///
    /// Fails with [`RegistryError::NoMatchingGrant`] when the caller owns no
    /// matching grant at all, and with [`RegistryError::TimelockActive`]
    /// when any selected candidate is still locked at `now` - in which case
    /// nothing is removed. Returns the number removed (0 when the lock
    /// filter deselects every candidate).
    pub async fn delete_grant(
        &self,
        caller: &Identity,
        grantee: &Identity,
        data_id: &str,
        locked_until: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<usize> {
        let mut indexes = self.indexes.write().await;

        let pattern = GrantQuery::new()
            .owner(*caller)
            .grantee(*grantee)
            .data_id(data_id);
        let candidate_ids = query::resolve(&indexes, &pattern)?;
        if candidate_ids.is_empty() {
            return Err(RegistryError::NoMatchingGrant {
                owner: *caller,
                grantee: *grantee,
                data_id: data_id.to_string(),
            });
        }

        // Select and validate everything before the first write: one locked
        // candidate aborts the whole call.
        let mut selected = Vec::new();
        for id in candidate_ids {
            let grant = self.materialize(&id).await?;
            if !lock_filter_matches(locked_until, grant.locked_until) {
                continue;
            }
            if !grant.is_unlocked(now) {
                return Err(RegistryError::TimelockActive {
                    id,
                    locked_until: grant.locked_until,
                });
            }
            selected.push((id, grant));
        }

        let ids: Vec<GrantId> = selected.iter().map(|(id, _)| *id).collect();
        self.store.remove_batch(&ids).await?;
        for (id, grant) in &selected {
            indexes.remove(grant, id);
            info!(
                event = "grant_deleted",
                owner = %grant.owner,
                grantee = %grant.grantee,
                data_id = %grant.data_id,
                locked_until = grant.locked_until,
                id = %id,
            );
        }

        Ok(selected.len())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Find grants matching a pattern.
    ///
    /// Results are ordered by grant id. An empty result is `Ok(vec![])`,
    /// never an error.
    pub async fn find_grants(&self, pattern: &GrantQuery) -> Result<Vec<Grant>> {
        let indexes = self.indexes.read().await;
        let ids = query::resolve(&indexes, pattern)?;

        let mut grants = Vec::with_capacity(ids.len());
        for id in &ids {
            grants.push(self.materialize(id).await?);
        }
        Ok(grants)
    }

    /// All grants naming `grantee` for `data_id`, by any owner.
    pub async fn grants_for(&self, grantee: &Identity, data_id: &str) -> Result<Vec<Grant>> {
        self.find_grants(&GrantQuery::new().grantee(*grantee).data_id(data_id))
            .await
    }

    /// Number of stored grants.
    pub async fn grant_count(&self) -> Result<u64> {
        Ok(self.store.count().await?)
    }

    /// Check store/index consistency.
    pub async fn verify_invariants(&self) -> Result<()> {
        let indexes = self.indexes.read().await;
        let records = self.store.scan_all().await?;
        indexes.verify(&records).map_err(RegistryError::Inconsistent)
    }

    /// Look up an indexed id, treating a missing record as corruption.
    async fn materialize(&self, id: &GrantId) -> Result<Grant> {
        self.store.get(id).await?.ok_or_else(|| {
            RegistryError::Inconsistent(format!("index references missing grant {}", id))
        })
    }
}

/// Whether a delete-time lock filter selects a candidate.
///
/// `None` and `Some(0)` both mean "no filter"; a caller cannot target only
/// grants whose lock value is literally 0, but those are always unlocked
/// and fall to an unfiltered delete.
fn lock_filter_matches(filter: Option<Timestamp>, locked_until: Timestamp) -> bool {
    match filter {
        None | Some(0) => true,
        Some(t) => locked_until == t,
    }
}
