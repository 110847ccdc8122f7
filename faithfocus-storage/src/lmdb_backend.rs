//! LMDB-backed key-value store.
//!
//! Uses the heed crate (Rust bindings for LMDB) as the device-local
//! persistent store for cached chapters. The environment is sized once at
//! open; when the map is full, writes fail with
//! [`StoreError::QuotaExceeded`] instead of growing it.

use std::path::Path;

use async_trait::async_trait;
use faithfocus_core::{StoreError, StoreResult};
use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions};

use crate::traits::KeyValueStore;

/// Error type for opening an LMDB store.
#[derive(Debug, thiserror::Error)]
pub enum LmdbStoreError {
    /// Failed to open or create the LMDB environment.
    #[error("Failed to open LMDB environment: {0}")]
    EnvOpen(String),

    /// Failed to open the database within the environment.
    #[error("Failed to open database: {0}")]
    DbOpen(String),

    /// Transaction error.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LmdbStoreError> for StoreError {
    fn from(e: LmdbStoreError) -> Self {
        match e {
            LmdbStoreError::Io(io) => StoreError::from(io),
            other => StoreError::Backend {
                reason: other.to_string(),
            },
        }
    }
}

/// Persistent string store on an LMDB environment.
///
/// # Example
///
/// ```ignore
/// let store = LmdbStore::open("/var/cache/faithfocus", 64)?;
/// store.set("bible-ENGKJV-JHN.1", r#"{"data":{...},"timestamp":0}"#).await?;
/// ```
pub struct LmdbStore {
    env: Env,
    db: Database<Str, Str>,
}

impl LmdbStore {
    /// Open (creating if needed) a store in `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `max_size_mb` - Maximum size of the map in megabytes
    pub fn open<P: AsRef<Path>>(path: P, max_size_mb: usize) -> Result<Self, LmdbStoreError> {
        std::fs::create_dir_all(&path)?;

        // SAFETY: the environment is opened once per directory by this
        // process and is never memory-mapped elsewhere.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| LmdbStoreError::EnvOpen(e.to_string()))?;

        let mut wtxn = env
            .write_txn()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        let db: Database<Str, Str> = env
            .create_database(&mut wtxn, None)
            .map_err(|e| LmdbStoreError::DbOpen(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| LmdbStoreError::Transaction(e.to_string()))?;

        Ok(Self { env, db })
    }

    /// Number of stored keys.
    pub fn len(&self) -> StoreResult<u64> {
        let rtxn = self.env.read_txn().map_err(backend_error)?;
        self.db.len(&rtxn).map_err(backend_error)
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn backend_error(e: heed::Error) -> StoreError {
    StoreError::Backend {
        reason: e.to_string(),
    }
}

fn write_error(e: heed::Error, key: &str, requested: usize) -> StoreError {
    match e {
        heed::Error::Mdb(heed::MdbError::MapFull) => StoreError::QuotaExceeded {
            key: key.to_string(),
            requested,
            available: 0,
        },
        other => backend_error(other),
    }
}

#[async_trait]
impl KeyValueStore for LmdbStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let rtxn = self.env.read_txn().map_err(backend_error)?;
        let value = self
            .db
            .get(&rtxn, key)
            .map_err(backend_error)?
            .map(str::to_owned);
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let requested = key.len() + value.len();
        let mut wtxn = self.env.write_txn().map_err(backend_error)?;

        self.db
            .put(&mut wtxn, key, value)
            .map_err(|e| write_error(e, key, requested))?;

        wtxn.commit().map_err(|e| write_error(e, key, requested))
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut wtxn = self.env.write_txn().map_err(backend_error)?;
        self.db.delete(&mut wtxn, key).map_err(backend_error)?;
        wtxn.commit().map_err(backend_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (LmdbStore, TempDir) {
        let temp_dir = TempDir::new().expect("TempDir creation should succeed");
        let store = LmdbStore::open(temp_dir.path(), 10).expect("store creation should succeed");
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let (store, _temp_dir) = create_test_store();

        store
            .set("bible-ENGKJV-JHN.1", r#"{"data":{"content":"x"},"timestamp":1}"#)
            .await
            .expect("set should succeed");

        let value = store
            .get("bible-ENGKJV-JHN.1")
            .await
            .expect("get should succeed");
        assert_eq!(
            value.as_deref(),
            Some(r#"{"data":{"content":"x"},"timestamp":1}"#)
        );
        assert_eq!(store.len().expect("len should succeed"), 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let (store, _temp_dir) = create_test_store();
        let value = store.get("bible-NONE-X.1").await.expect("get should succeed");
        assert!(value.is_none());
        assert!(store.is_empty().expect("is_empty should succeed"));
    }

    #[tokio::test]
    async fn test_overwrite() {
        let (store, _temp_dir) = create_test_store();
        store.set("k", "first").await.expect("set should succeed");
        store.set("k", "second").await.expect("set should succeed");
        assert_eq!(
            store.get("k").await.expect("get should succeed").as_deref(),
            Some("second")
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _temp_dir) = create_test_store();
        store.set("k", "v").await.expect("set should succeed");
        store.remove("k").await.expect("remove should succeed");
        assert!(store.get("k").await.expect("get should succeed").is_none());

        // Deleting again is a no-op.
        store.remove("k").await.expect("remove should succeed");
    }

    #[tokio::test]
    async fn test_reopen_persists() {
        let temp_dir = TempDir::new().expect("TempDir creation should succeed");
        {
            let store = LmdbStore::open(temp_dir.path(), 10).expect("open should succeed");
            store.set("k", "durable").await.expect("set should succeed");
        }
        let store = LmdbStore::open(temp_dir.path(), 10).expect("reopen should succeed");
        assert_eq!(
            store.get("k").await.expect("get should succeed").as_deref(),
            Some("durable")
        );
    }

    #[tokio::test]
    async fn test_map_full_reports_quota() {
        let (store, _temp_dir) = create_test_store();
        let chunk = "x".repeat(1024 * 1024);

        let mut failure = None;
        for i in 0..32 {
            if let Err(e) = store.set(&format!("k{i}"), &chunk).await {
                failure = Some(e);
                break;
            }
        }
        assert!(matches!(failure, Some(StoreError::QuotaExceeded { .. })));
    }
}
