//! FaithFocus Storage - Key-Value Stores and the Chapter Cache
//!
//! Chapter bodies fetched from the upstream API are kept in a persistent
//! key-value store for a fixed TTL. The store is injected through
//! [`KeyValueStore`]: [`LmdbStore`] on disk, [`InMemoryStore`] in tests.
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(LmdbStore::open(cache_dir, 64)?);
//! let cache = ChapterCache::new(client, store, CacheConfig::default());
//!
//! let read = cache.read_chapter_body("ENGKJV", "JHN.1").await?;
//! if !read.is_persisted() {
//!     tracing::warn!("chapter served without caching");
//! }
//! ```

pub mod chapter_cache;
pub mod entry;
pub mod in_flight;
pub mod key;
pub mod lmdb_backend;
pub mod memory;
pub mod read;
pub mod traits;

pub use chapter_cache::{CacheStats, ChapterCache};
pub use entry::CacheEntry;
pub use in_flight::{KeyLockGuard, KeyLocks};
pub use key::ChapterKey;
pub use lmdb_backend::{LmdbStore, LmdbStoreError};
pub use memory::InMemoryStore;
pub use read::{CacheOutcome, CacheRead};
pub use traits::KeyValueStore;
