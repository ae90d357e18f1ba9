//! Test fixtures and helpers.
//!
//! Common setup code for registry tests.

use grant_registry::{Registry, Result};
use grant_registry_core::{Grant, GrantId, Keypair, Timestamp};
use grant_registry_store::MemoryStore;

/// A test fixture with an in-memory registry and a deterministic cast of
/// principals.
pub struct TestFixture {
    pub registry: Registry<MemoryStore>,
    pub alice: Keypair,
    pub bob: Keypair,
    pub charlie: Keypair,
}

impl TestFixture {
    /// Create a new fixture.
    pub fn new() -> Self {
        Self {
            registry: Registry::in_memory(),
            alice: Keypair::from_seed(&[0xa1; 32]),
            bob: Keypair::from_seed(&[0xb0; 32]),
            charlie: Keypair::from_seed(&[0xc4; 32]),
        }
    }

    /// Insert a grant owned by `owner`. A `locked_until` of 0 means no lock.
    pub async fn insert(
        &self,
        owner: &Keypair,
        grantee: &Keypair,
        data_id: &str,
        locked_until: Timestamp,
    ) -> Result<GrantId> {
        self.registry
            .insert_grant(
                &owner.identity(),
                &grantee.identity(),
                data_id,
                Some(locked_until),
            )
            .await
    }

    /// All grants naming `grantee` for `data_id`.
    pub async fn grants_for(&self, grantee: &Keypair, data_id: &str) -> Result<Vec<Grant>> {
        self.registry
            .grants_for(&grantee.identity(), data_id)
            .await
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create `count` deterministic principals for multi-party tests.
pub fn principals(count: usize) -> Vec<Keypair> {
    (0..count)
        .map(|i| {
            let mut seed = [0x5au8; 32];
            seed[0] = i as u8;
            Keypair::from_seed(&seed)
        })
        .collect()
}
