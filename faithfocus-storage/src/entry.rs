//! Persisted cache entry.

use chrono::DateTime;
use faithfocus_core::{CacheError, Timestamp};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A cached payload and the time it was written.
///
/// Stored as JSON `{ "data": <payload>, "timestamp": <epoch ms> }`. There is
/// no shape version: anything that fails to parse is treated as corrupt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    /// Milliseconds since the UNIX epoch.
    pub timestamp: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, stored_at: Timestamp) -> Self {
        Self {
            data,
            timestamp: stored_at.timestamp_millis(),
        }
    }

    /// When the entry was written. `None` if the stored timestamp is out of range.
    pub fn stored_at(&self) -> Option<Timestamp> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Milliseconds between the write and `now_ms`. Negative if the entry is
    /// stamped in the future.
    pub fn age_millis(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.timestamp)
    }

    /// An entry is fresh while its age is strictly below the TTL.
    pub fn is_fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        self.age_millis(now_ms) < ttl_ms
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T: Serialize> CacheEntry<T> {
    pub fn encode(&self, key: &str) -> Result<String, CacheError> {
        serde_json::to_string(self).map_err(|e| CacheError::Encode {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

impl<T: DeserializeOwned> CacheEntry<T> {
    pub fn decode(key: &str, raw: &str) -> Result<Self, CacheError> {
        serde_json::from_str(raw).map_err(|e| CacheError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use faithfocus_core::ChapterBody;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    const TTL_MS: i64 = 30 * DAY_MS;

    #[test]
    fn test_encode_shape() {
        let stored_at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let entry = CacheEntry::new(ChapterBody::from_content("<p>x</p>"), stored_at);
        let raw = entry.encode("k").unwrap();
        assert_eq!(raw, r#"{"data":{"content":"<p>x</p>"},"timestamp":1700000000000}"#);
    }

    #[test]
    fn test_decode_accepts_stored_shape() {
        let raw = r#"{"data":{"content":"<p>In the beginning...</p>"},"timestamp":42}"#;
        let entry: CacheEntry<ChapterBody> = CacheEntry::decode("k", raw).unwrap();
        assert_eq!(entry.timestamp, 42);
        assert_eq!(entry.data.content, "<p>In the beginning...</p>");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        for raw in ["not json", "{}", r#"{"data":{"content":"x"}}"#, r#"{"timestamp":1}"#] {
            let err = CacheEntry::<ChapterBody>::decode("bible-a-b", raw).unwrap_err();
            assert!(matches!(err, CacheError::Corrupt { ref key, .. } if key == "bible-a-b"));
        }
    }

    #[test]
    fn test_freshness_boundary() {
        let now = Utc::now();
        let entry = CacheEntry::new((), now - Duration::milliseconds(TTL_MS));
        let now_ms = now.timestamp_millis();
        assert!(!entry.is_fresh(now_ms, TTL_MS), "age == TTL is expired");
        assert!(entry.is_fresh(now_ms - 1, TTL_MS));
    }

    #[test]
    fn test_one_day_old_is_fresh_forty_days_is_not() {
        let now = Utc::now();
        let now_ms = now.timestamp_millis();
        assert!(CacheEntry::new((), now - Duration::days(1)).is_fresh(now_ms, TTL_MS));
        assert!(!CacheEntry::new((), now - Duration::days(40)).is_fresh(now_ms, TTL_MS));
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        let now = Utc::now();
        let entry = CacheEntry::new((), now + Duration::days(2));
        assert!(entry.age_millis(now.timestamp_millis()) < 0);
        assert!(entry.is_fresh(now.timestamp_millis(), TTL_MS));
    }

    #[test]
    fn test_stored_at_roundtrip() {
        let stored_at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let entry = CacheEntry::new((), stored_at);
        assert_eq!(entry.stored_at(), Some(stored_at));
    }
}
