//! Key-value store trait.
//!
//! The chapter cache persists entries through this seam so it can run
//! against an on-disk LMDB environment in production and an in-memory map
//! in tests.

use async_trait::async_trait;
use faithfocus_core::StoreResult;
use std::sync::Arc;

/// A string-keyed, string-valued persistent store.
///
/// All keys share one namespace. Every `set` is a single-key overwrite: a
/// reader sees either the old value or the new one, never a partial write.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Fails with [`StoreError::QuotaExceeded`](faithfocus_core::StoreError::QuotaExceeded)
    /// when the backend is out of space.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key).await
    }
}
