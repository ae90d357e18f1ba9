//! # Grant Registry
//!
//! An authoritative, queryable store of access grants: owner X permits
//! grantee Y to read data item Z, optionally locked until time T.
//!
//! ## Overview
//!
//! The registry is a sequentially-consistent state machine over one record
//! shape. Callers authenticated by the surrounding environment create and
//! revoke grants they own; anyone may query by owner, grantee, and/or data
//! id. Three secondary indexes back the queries and are kept strictly
//! consistent with the record store.
//!
//! ## Key Concepts
//!
//! - **Grant**: immutable. Created by insert, destroyed by delete, never
//!   edited in place.
//! - **GrantId**: content digest of the four fields. Inserting the exact
//!   same grant twice is rejected.
//! - **Timelock**: a locked grant is fully visible to queries; the lock only
//!   gates deletion, and a bulk delete that hits one locked grant removes
//!   nothing at all.
//! - **Wildcard**: a `data_id` of `"*"` in a query matches any data id.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use grant_registry::{GrantQuery, Registry};
//! use grant_registry_core::Keypair;
//!
//! async fn example() {
//!     let registry = Registry::in_memory();
//!
//!     let alice = Keypair::generate().identity();
//!     let bob = Keypair::generate().identity();
//!
//!     let grant_id = registry
//!         .insert_grant(&alice, &bob, "passport-scan", None)
//!         .await
//!         .unwrap();
//!
//!     let grants = registry
//!         .find_grants(&GrantQuery::new().owner(alice).grantee(bob))
//!         .await
//!         .unwrap();
//!     assert_eq!(grants.len(), 1);
//!     let _ = grant_id;
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `grant_registry::core` - core primitives (Grant, GrantId, Identity)
//! - `grant_registry::store` - storage abstraction and SQLite backend

pub mod error;
pub mod index;
pub mod query;
pub mod registry;

// Re-export component crates
pub use grant_registry_core as core;
pub use grant_registry_store as store;

// Re-export main types for convenience
pub use error::{RegistryError, Result};
pub use index::GrantIndexes;
pub use query::GrantQuery;
pub use registry::{Registry, RegistryConfig};

// Re-export commonly used core types
pub use grant_registry_core::{Grant, GrantId, Identity, Keypair, Timestamp, WILDCARD_DATA_ID};
