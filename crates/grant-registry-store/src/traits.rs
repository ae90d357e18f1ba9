//! GrantStore trait: the abstract interface for grant record persistence.
//!
//! This trait allows the registry to be storage-agnostic. Implementations
//! include SQLite (durable) and in-memory (for tests).

use async_trait::async_trait;
use grant_registry_core::{Grant, GrantId};

use crate::error::Result;

/// The GrantStore trait: async interface for grant record persistence.
///
/// A store is a pure keyed container. No validation logic lives here.
///
/// # Design Notes
///
/// - **No preconditions**: `put` overwrites silently and removing a missing
///   id is not an error. Duplicate detection and timelock gating belong to
///   the registry, which checks them before writing.
/// - **Atomic batches**: `remove_batch` removes every listed id or none of
///   them. The registry relies on this for all-or-nothing bulk deletes.
/// - **Scan for rebuild**: secondary indexes are not persisted. `scan_all`
///   lets the registry rebuild them when opening a durable store.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Get a grant by its content-addressed id.
    async fn get(&self, id: &GrantId) -> Result<Option<Grant>>;

    /// Check whether a grant exists by id.
    async fn contains(&self, id: &GrantId) -> Result<bool>;

    /// Insert a grant record under `id`.
    async fn put(&self, id: &GrantId, grant: &Grant) -> Result<()>;

    /// Remove a single record. Returns whether a record was present.
    async fn remove(&self, id: &GrantId) -> Result<bool>;

    /// Remove a batch of records as one atomic unit.
    async fn remove_batch(&self, ids: &[GrantId]) -> Result<()>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64>;

    /// Full scan of all records, in no particular order.
    async fn scan_all(&self) -> Result<Vec<(GrantId, Grant)>>;
}
