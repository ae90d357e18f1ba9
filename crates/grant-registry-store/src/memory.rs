//! In-memory implementation of the GrantStore trait.
//!
//! This is primarily for testing and for registries that do not need to
//! survive a restart. Same semantics as SQLite, nothing persisted.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use grant_registry_core::{Grant, GrantId};

use crate::error::Result;
use crate::traits::GrantStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug)]
pub struct MemoryStore {
    records: RwLock<HashMap<GrantId, Grant>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GrantStore for MemoryStore {
    async fn get(&self, id: &GrantId) -> Result<Option<Grant>> {
        let records = self.records.read().unwrap();
        Ok(records.get(id).cloned())
    }

    async fn contains(&self, id: &GrantId) -> Result<bool> {
        let records = self.records.read().unwrap();
        Ok(records.contains_key(id))
    }

    async fn put(&self, id: &GrantId, grant: &Grant) -> Result<()> {
        let mut records = self.records.write().unwrap();
        records.insert(*id, grant.clone());
        Ok(())
    }

    async fn remove(&self, id: &GrantId) -> Result<bool> {
        let mut records = self.records.write().unwrap();
        Ok(records.remove(id).is_some())
    }

    async fn remove_batch(&self, ids: &[GrantId]) -> Result<()> {
        let mut records = self.records.write().unwrap();
        for id in ids {
            records.remove(id);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let records = self.records.read().unwrap();
        Ok(records.len() as u64)
    }

    async fn scan_all(&self) -> Result<Vec<(GrantId, Grant)>> {
        let records = self.records.read().unwrap();
        Ok(records.iter().map(|(id, g)| (*id, g.clone())).collect())
    }
}
