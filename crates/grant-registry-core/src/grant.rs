//! The grant record: owner permits grantee to read a data item.

use serde::{Deserialize, Serialize};

use crate::canonical::derive_grant_id;
use crate::identity::Identity;
use crate::types::GrantId;

/// Registry timestamps, in whatever unit the surrounding environment uses.
///
/// The registry never reads a clock; every operation that needs the current
/// time takes it as an argument.
pub type Timestamp = u64;

/// Reserved data-id marker meaning "match any data id" in queries.
///
/// The sentinel is only special on the query side. A grant whose literal
/// `data_id` is `"*"` can still be inserted, but it cannot then be queried
/// selectively: a query naming `"*"` matches every data id. Callers that
/// need to avoid the ambiguity must keep `"*"` out of their data-id space.
pub const WILDCARD_DATA_ID: &str = "*";

/// An access grant.
///
/// Immutable once created: a grant is only ever inserted or removed, never
/// edited. Its identity is the content digest of the four fields, so two
/// grants with identical fields are the same grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// The principal that created the grant and exclusively may delete it.
    pub owner: Identity,

    /// The principal permitted to read the data item.
    pub grantee: Identity,

    /// Opaque identifier of the data item covered by the grant.
    pub data_id: String,

    /// Deletion is forbidden until this time has passed. 0 = no lock.
    pub locked_until: Timestamp,
}

impl Grant {
    /// Create a new grant record.
    pub fn new(
        owner: Identity,
        grantee: Identity,
        data_id: impl Into<String>,
        locked_until: Timestamp,
    ) -> Self {
        Self {
            owner,
            grantee,
            data_id: data_id.into(),
            locked_until,
        }
    }

    /// Compute the content-addressed id of this grant.
    pub fn compute_id(&self) -> GrantId {
        derive_grant_id(self)
    }

    /// Whether the timelock has expired at `now`.
    ///
    /// A `locked_until` of 0 never locks; otherwise the lock must be
    /// strictly in the past.
    pub fn is_unlocked(&self, now: Timestamp) -> bool {
        self.locked_until == 0 || self.locked_until < now
    }
}
