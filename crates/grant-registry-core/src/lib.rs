//! # Grant Registry Core
//!
//! Pure primitives for the Grant Registry: grants, identities, and the
//! canonical digest that names a grant.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over the registry's record types.
//!
//! ## Key Types
//!
//! - [`Grant`] - an access record: owner permits grantee to read a data item
//! - [`GrantId`] - content-addressed identifier (Blake3 over canonical CBOR)
//! - [`Identity`] - an externally-authenticated principal
//!
//! ## Canonicalization
//!
//! A GrantId is a pure function of the four grant fields: the fields are
//! encoded as deterministic CBOR and hashed under a domain prefix. See the
//! [`canonical`] module.

pub mod canonical;
pub mod error;
pub mod grant;
pub mod identity;
pub mod types;

pub use canonical::{canonical_grant_bytes, derive_grant_id};
pub use error::CoreError;
pub use grant::{Grant, Timestamp, WILDCARD_DATA_ID};
pub use identity::{Identity, Keypair};
pub use types::GrantId;
