//! Read-through chapter cache.
//!
//! Memoizes [`ContentClient::get_chapter_body`] per `(version, chapter)` for
//! a fixed TTL in a [`KeyValueStore`]. Only [`UpstreamError`] ever reaches
//! the caller: corrupt entries are deleted and refetched, and failed writes
//! are logged while the fetched body is still returned.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use faithfocus_core::{
    CacheConfig, CacheError, ChapterBody, Clock, ContentClient, SystemClock, Timestamp,
    UpstreamResult,
};
use tracing::{debug, info, warn};

use crate::entry::CacheEntry;
use crate::in_flight::KeyLocks;
use crate::key::ChapterKey;
use crate::read::CacheRead;
use crate::traits::KeyValueStore;

/// Snapshot of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads served from a live entry.
    pub hits: u64,
    /// Reads that went upstream, for any reason.
    pub misses: u64,
    /// Misses caused by an entry past its TTL.
    pub expired: u64,
    /// Misses caused by an entry that failed to parse.
    pub corrupt: u64,
    /// Fetched bodies that could not be written back.
    pub write_failures: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
    corrupt: AtomicU64,
    write_failures: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            corrupt: self.corrupt.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }
}

/// Chapter body cache in front of a [`ContentClient`].
///
/// # Type Parameters
///
/// - `C`: the upstream content client, consulted on miss
/// - `S`: the persistent store holding entries
/// - `K`: the clock used for timestamps and expiry
///
/// # Example
///
/// ```ignore
/// let cache = ChapterCache::new(client, store, CacheConfig::default());
/// let body = cache.get_chapter_body("ENGKJV", "JHN.1").await?;
/// ```
pub struct ChapterCache<C, S, K = SystemClock>
where
    C: ContentClient,
    S: KeyValueStore,
    K: Clock,
{
    client: Arc<C>,
    store: Arc<S>,
    clock: Arc<K>,
    config: CacheConfig,
    in_flight: Arc<KeyLocks>,
    counters: Arc<Counters>,
}

impl<C, S> ChapterCache<C, S, SystemClock>
where
    C: ContentClient,
    S: KeyValueStore,
{
    /// Create a cache on the system clock.
    pub fn new(client: Arc<C>, store: Arc<S>, config: CacheConfig) -> Self {
        Self::with_clock(client, store, Arc::new(SystemClock), config)
    }
}

impl<C, S, K> ChapterCache<C, S, K>
where
    C: ContentClient,
    S: KeyValueStore,
    K: Clock,
{
    /// Create a cache with an explicit clock.
    pub fn with_clock(client: Arc<C>, store: Arc<S>, clock: Arc<K>, config: CacheConfig) -> Self {
        Self {
            client,
            store,
            clock,
            config,
            in_flight: Arc::new(KeyLocks::new()),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the upstream client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// The storage key for a `(version, chapter)` pair.
    pub fn key_for(&self, version_id: &str, chapter_id: &str) -> ChapterKey {
        ChapterKey::new(&self.config.key_prefix, version_id, chapter_id)
    }

    /// Get a chapter body, from the store if a live entry exists, otherwise
    /// from the upstream client.
    pub async fn get_chapter_body(
        &self,
        version_id: &str,
        chapter_id: &str,
    ) -> UpstreamResult<ChapterBody> {
        self.read_chapter_body(version_id, chapter_id)
            .await
            .map(CacheRead::into_value)
    }

    /// Like [`get_chapter_body`](Self::get_chapter_body), but reports whether
    /// the body was a hit, freshly cached, or served without being cached.
    pub async fn read_chapter_body(
        &self,
        version_id: &str,
        chapter_id: &str,
    ) -> UpstreamResult<CacheRead<ChapterBody>> {
        let key = self.key_for(version_id, chapter_id);

        if self.config.coalesce_in_flight {
            let _guard = self.in_flight.acquire(key.as_str()).await;
            self.read_through(&key, version_id, chapter_id).await
        } else {
            self.read_through(&key, version_id, chapter_id).await
        }
    }

    async fn read_through(
        &self,
        key: &ChapterKey,
        version_id: &str,
        chapter_id: &str,
    ) -> UpstreamResult<CacheRead<ChapterBody>> {
        if let Some(entry) = self.lookup(key).await {
            Counters::bump(&self.counters.hits);
            debug!(key = %key, "chapter cache hit");
            let stored_at = entry.stored_at().unwrap_or_else(|| self.clock.now());
            return Ok(CacheRead::from_cache(entry.into_data(), stored_at));
        }
        Counters::bump(&self.counters.misses);

        let body = self
            .client
            .get_chapter_body(version_id, chapter_id)
            .await
            .inspect_err(|e| warn!(key = %key, error = %e, "chapter fetch failed"))?;

        let fetched_at = self.clock.now();
        match self.store_entry(key, &body, fetched_at).await {
            Ok(()) => {
                info!(key = %key, "chapter cached");
                Ok(CacheRead::from_upstream(body, fetched_at, true))
            }
            Err(e) => {
                Counters::bump(&self.counters.write_failures);
                warn!(key = %key, error = %e, "serving chapter uncached");
                Ok(CacheRead::from_upstream(body, fetched_at, false))
            }
        }
    }

    /// Return the live entry under `key`, evicting it if it is expired or
    /// unparsable. Store read failures count as a miss.
    async fn lookup(&self, key: &ChapterKey) -> Option<CacheEntry<ChapterBody>> {
        let raw = match self.store.get(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "chapter cache read failed");
                return None;
            }
        };

        let entry = match CacheEntry::<ChapterBody>::decode(key.as_str(), &raw) {
            Ok(entry) => entry,
            Err(e) => {
                Counters::bump(&self.counters.corrupt);
                warn!(key = %key, error = %e, "discarding corrupt chapter cache entry");
                self.evict(key).await;
                return None;
            }
        };

        if entry.is_fresh(self.clock.now_millis(), self.config.ttl_millis()) {
            Some(entry)
        } else {
            Counters::bump(&self.counters.expired);
            debug!(key = %key, stored_at = entry.timestamp, "chapter cache entry expired");
            self.evict(key).await;
            None
        }
    }

    async fn evict(&self, key: &ChapterKey) {
        if let Err(e) = self.store.remove(key.as_str()).await {
            warn!(key = %key, error = %e, "failed to evict chapter cache entry");
        }
    }

    /// Write `body` under `key` stamped with `stored_at`, replacing any
    /// previous entry.
    pub async fn store_entry(
        &self,
        key: &ChapterKey,
        body: &ChapterBody,
        stored_at: Timestamp,
    ) -> Result<(), CacheError> {
        let raw = CacheEntry::new(body, stored_at).encode(key.as_str())?;
        self.store
            .set(key.as_str(), &raw)
            .await
            .map_err(|source| CacheError::Write {
                key: key.to_string(),
                source,
            })
    }
}

impl<C, S, K> Clone for ChapterCache<C, S, K>
where
    C: ContentClient,
    S: KeyValueStore,
    K: Clock,
{
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
            in_flight: Arc::clone(&self.in_flight),
            counters: Arc::clone(&self.counters),
        }
    }
}
