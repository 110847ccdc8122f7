//! Cache read results.
//!
//! A [`CacheRead`] carries where the value came from so callers can tell a
//! cache hit from a fresh fetch, and a fetch that was persisted from one
//! that could not be.

use faithfocus_core::Timestamp;

/// How a read was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Served from a live stored entry; no upstream call was made.
    Hit,
    /// Fetched upstream and written to the store.
    Cached,
    /// Fetched upstream, but the store write failed.
    Uncached,
}

/// Result of a cache read, carrying provenance metadata.
#[derive(Debug, Clone)]
pub struct CacheRead<T> {
    value: T,
    /// When the value was written (hit) or fetched (miss).
    stored_at: Timestamp,
    outcome: CacheOutcome,
}

impl<T> CacheRead<T> {
    /// A read served from a stored entry.
    pub fn from_cache(value: T, stored_at: Timestamp) -> Self {
        Self {
            value,
            stored_at,
            outcome: CacheOutcome::Hit,
        }
    }

    /// A read fetched upstream. `persisted` records whether the store write succeeded.
    pub fn from_upstream(value: T, fetched_at: Timestamp, persisted: bool) -> Self {
        Self {
            value,
            stored_at: fetched_at,
            outcome: if persisted {
                CacheOutcome::Cached
            } else {
                CacheOutcome::Uncached
            },
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn outcome(&self) -> CacheOutcome {
        self.outcome
    }

    pub fn stored_at(&self) -> Timestamp {
        self.stored_at
    }

    pub fn was_cache_hit(&self) -> bool {
        self.outcome == CacheOutcome::Hit
    }

    pub fn was_cache_miss(&self) -> bool {
        !self.was_cache_hit()
    }

    /// True if the value is in the store after this read.
    pub fn is_persisted(&self) -> bool {
        self.outcome != CacheOutcome::Uncached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_cache_read_from_cache() {
        let stored_at = Utc::now();
        let read = CacheRead::from_cache("value".to_string(), stored_at);

        assert!(read.was_cache_hit());
        assert!(!read.was_cache_miss());
        assert!(read.is_persisted());
        assert_eq!(read.outcome(), CacheOutcome::Hit);
        assert_eq!(read.value(), "value");
        assert_eq!(read.stored_at(), stored_at);
    }

    #[test]
    fn test_cache_read_from_upstream() {
        let cached = CacheRead::from_upstream(1, Utc::now(), true);
        assert_eq!(cached.outcome(), CacheOutcome::Cached);
        assert!(cached.is_persisted());
        assert!(cached.was_cache_miss());

        let uncached = CacheRead::from_upstream(1, Utc::now(), false);
        assert_eq!(uncached.outcome(), CacheOutcome::Uncached);
        assert!(!uncached.is_persisted());
    }
}
