//! Error types for FaithFocus operations

use thiserror::Error;

/// Failure talking to the upstream scripture API.
///
/// Transport failures, non-success statuses and undecodable bodies all
/// collapse into this one type. `status` is `None` when no response arrived.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{context} failed{}: {reason}", .status.map(|s| format!(" with status {s}")).unwrap_or_default())]
pub struct UpstreamError {
    /// Which operation failed, e.g. `get_chapter_body ENGKJV/JHN.1`.
    pub context: String,
    /// HTTP status code, if the upstream answered.
    pub status: Option<u16>,
    /// Status text, response body or transport error message.
    pub reason: String,
}

impl UpstreamError {
    pub fn new(context: impl Into<String>, status: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            status,
            reason: reason.into(),
        }
    }

    /// An error raised before any request was sent.
    pub fn invalid_argument(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(context, None, reason)
    }

    /// True if the upstream answered with the given status.
    pub fn has_status(&self, status: u16) -> bool {
        self.status == Some(status)
    }
}

/// Key-value store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage quota exceeded writing {key}: {requested} bytes requested, {available} available")]
    QuotaExceeded {
        key: String,
        requested: usize,
        available: usize,
    },

    #[error("Storage backend error: {reason}")]
    Backend { reason: String },

    #[error("Storage I/O error: {reason}")]
    Io { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io {
            reason: e.to_string(),
        }
    }
}

/// Chapter cache faults. These never cross the cache boundary; they are
/// logged and absorbed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Corrupt cache entry at {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Failed to write cache entry at {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to encode cache entry at {key}: {reason}")]
    Encode { key: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or FAITHFOCUS_CONFIG)")]
    MissingConfigPath,

    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Result type for content client calls.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Result type for key-value store calls.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_display_with_status() {
        let err = UpstreamError::new("get_chapter_body ENGKJV/JHN.1", Some(404), "Not Found");
        let msg = format!("{}", err);
        assert!(msg.contains("get_chapter_body ENGKJV/JHN.1"));
        assert!(msg.contains("404"));
        assert!(msg.contains("Not Found"));
        assert!(err.has_status(404));
    }

    #[test]
    fn test_upstream_error_display_without_status() {
        let err = UpstreamError::new("list_versions", None, "connection refused");
        let msg = format!("{}", err);
        assert_eq!(msg, "list_versions failed: connection refused");
        assert!(!err.has_status(404));
    }

    #[test]
    fn test_store_error_display_quota() {
        let err = StoreError::QuotaExceeded {
            key: "bible-ENGKJV-JHN.1".to_string(),
            requested: 2048,
            available: 100,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("quota"));
        assert!(msg.contains("2048"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn test_cache_error_write_keeps_source() {
        use std::error::Error as _;

        let err = CacheError::Write {
            key: "bible-a-b".to_string(),
            source: StoreError::LockPoisoned,
        };
        assert!(err.source().is_some());
        assert!(format!("{}", err).contains("bible-a-b"));
    }
}
