//! # Grant Registry Testkit
//!
//! Testing utilities for the Grant Registry.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: in-memory registries with a deterministic cast of
//!   principals, for quickly setting up test scenarios
//! - **Generators**: proptest strategies for identities, data ids, and
//!   whole grants
//!
//! The crate also hosts the model-based invariant suite
//! (`tests/invariants.rs`) and the criterion benchmarks
//! (`benches/queries.rs`).
//!
//! ## Test Fixtures
//!
//! ```rust
//! use grant_registry_testkit::TestFixture;
//!
//! # async fn example() {
//! let fixture = TestFixture::new();
//! fixture
//!     .insert(&fixture.alice, &fixture.bob, "payslip", 0)
//!     .await
//!     .unwrap();
//! # }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use grant_registry_testkit::{grant_from_params, GrantParams};
//!
//! proptest! {
//!     #[test]
//!     fn grant_id_is_deterministic(params: GrantParams) {
//!         let g1 = grant_from_params(&params);
//!         let g2 = grant_from_params(&params);
//!         prop_assert_eq!(g1.compute_id(), g2.compute_id());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{principals, TestFixture};
pub use generators::{grant_from_params, GrantParams};
