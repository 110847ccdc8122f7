//! FaithFocus Core - Content Types and Seams
//!
//! Read-only records returned by the upstream scripture API, the error
//! taxonomy shared by every crate, and the traits the cache is built against.
//! All other crates depend on this.

pub mod client;
pub mod clock;
pub mod config;
pub mod content;
pub mod error;

pub use client::ContentClient;
pub use clock::{Clock, SystemClock};
pub use config::{ApiConfig, CacheConfig, DEFAULT_BASE_URL, DEFAULT_KEY_PREFIX, DEFAULT_TTL};
pub use content::{Book, Chapter, ChapterBody, ContentVersion, Envelope, Language};
pub use error::{
    CacheError, ConfigError, StoreError, StoreResult, UpstreamError, UpstreamResult,
};

/// Timestamp type using UTC timezone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
