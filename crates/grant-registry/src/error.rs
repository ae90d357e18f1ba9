//! Error types for the registry.

use grant_registry_core::{GrantId, Identity, Timestamp};
use grant_registry_store::StoreError;
use thiserror::Error;

/// Errors that can occur during registry operations.
///
/// Every failure aborts the whole call with no partial effect: a failed
/// insert or delete leaves the store and indexes exactly as they were.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Insert of an already-existing exact record.
    #[error("grant already exists: {0}")]
    DuplicateGrant(GrantId),

    /// Delete found nothing owned by the caller matching grantee/data id.
    #[error("no grant by {owner} for {grantee} on {data_id:?}")]
    NoMatchingGrant {
        owner: Identity,
        grantee: Identity,
        data_id: String,
    },

    /// Delete blocked because a selected record's lock has not expired.
    #[error("grant {id} is timelocked until {locked_until}")]
    TimelockActive { id: GrantId, locked_until: Timestamp },

    /// Query names neither an owner nor a grantee.
    #[error("query must name an owner and/or a grantee")]
    InvalidQuery,

    /// Store and indexes disagree.
    #[error("registry state is inconsistent: {0}")]
    Inconsistent(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
