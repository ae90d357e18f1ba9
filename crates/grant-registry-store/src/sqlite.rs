//! SQLite implementation of the GrantStore trait.
//!
//! The durable backend for the Grant Registry. Uses rusqlite with bundled
//! SQLite behind a mutexed connection; every call runs on the blocking
//! thread pool via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use grant_registry_core::{Grant, GrantId, Identity};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::GrantStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(&path)?;
        migration::migrate(&mut conn)?;
        debug!(path = %path.as_ref().display(), "opened grant store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|e| {
                StoreError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                    Some(format!("mutex poisoned: {}", e)),
                ))
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                Some(format!("spawn_blocking failed: {}", e)),
            ))
        })?
    }
}

// Helper to convert a row to a Grant (expects named columns).
fn row_to_grant(row: &rusqlite::Row<'_>) -> rusqlite::Result<Grant> {
    let owner_bytes: Vec<u8> = row.get("owner")?;
    let grantee_bytes: Vec<u8> = row.get("grantee")?;
    let data_id: String = row.get("data_id")?;
    let locked_until: i64 = row.get("locked_until")?;

    Ok(Grant {
        owner: Identity::from_bytes(owner_bytes.try_into().map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "owner".into(), rusqlite::types::Type::Blob)
        })?),
        grantee: Identity::from_bytes(grantee_bytes.try_into().map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, "grantee".into(), rusqlite::types::Type::Blob)
        })?),
        data_id,
        locked_until: locked_until as u64,
    })
}

#[async_trait]
impl GrantStore for SqliteStore {
    async fn get(&self, id: &GrantId) -> Result<Option<Grant>> {
        let id = *id;
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT owner, grantee, data_id, locked_until FROM grants WHERE grant_id = ?1",
                params![id.0.as_slice()],
                row_to_grant,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn contains(&self, id: &GrantId) -> Result<bool> {
        let id = *id;
        self.with_conn(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM grants WHERE grant_id = ?1)",
                params![id.0.as_slice()],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
        .await
    }

    async fn put(&self, id: &GrantId, grant: &Grant) -> Result<()> {
        let id = *id;
        let grant = grant.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO grants (
                    grant_id, owner, grantee, data_id, locked_until, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id.0.as_slice(),
                    grant.owner.0.as_slice(),
                    grant.grantee.0.as_slice(),
                    &grant.data_id,
                    grant.locked_until as i64,
                    now_millis(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, id: &GrantId) -> Result<bool> {
        let id = *id;
        self.with_conn(move |conn| {
            let rows = conn.execute(
                "DELETE FROM grants WHERE grant_id = ?1",
                params![id.0.as_slice()],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    async fn remove_batch(&self, ids: &[GrantId]) -> Result<()> {
        let ids = ids.to_vec();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            for id in &ids {
                tx.execute(
                    "DELETE FROM grants WHERE grant_id = ?1",
                    params![id.0.as_slice()],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn count(&self) -> Result<u64> {
        self.with_conn(move |conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM grants", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    async fn scan_all(&self) -> Result<Vec<(GrantId, Grant)>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT grant_id, owner, grantee, data_id, locked_until FROM grants",
            )?;

            let records = stmt
                .query_map([], |row| {
                    let id_bytes: Vec<u8> = row.get("grant_id")?;
                    let id = GrantId::from_bytes(id_bytes.try_into().map_err(|_| {
                        rusqlite::Error::InvalidColumnType(
                            0,
                            "grant_id".into(),
                            rusqlite::types::Type::Blob,
                        )
                    })?);
                    Ok((id, row_to_grant(row)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(records)
        })
        .await
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
