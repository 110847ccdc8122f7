//! FaithFocus Test Utilities
//!
//! Shared test infrastructure for the FaithFocus workspace:
//! - A scripted content client that counts upstream calls
//! - A manual clock and a store with switchable failures
//! - Fixtures for the ENGKJV / John sample data
//! - Proptest generators for ids and chapter bodies

pub use faithfocus_core::{
    Book, CacheConfig, Chapter, ChapterBody, Clock, ContentClient, ContentVersion, Language,
    StoreError, StoreResult, Timestamp, UpstreamError, UpstreamResult,
};
pub use faithfocus_storage::{CacheEntry, InMemoryStore, KeyValueStore};

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// MOCK CONTENT CLIENT
// ============================================================================

/// Scripted [`ContentClient`].
///
/// Chapter bodies are looked up by `(version_id, chapter_id)`. Unknown
/// chapters answer with a 404 [`UpstreamError`], like the real API.
#[derive(Debug, Default)]
pub struct MockContentClient {
    versions: Vec<ContentVersion>,
    books: HashMap<String, Vec<Book>>,
    chapters: HashMap<(String, String), Vec<Chapter>>,
    bodies: HashMap<(String, String), ChapterBody>,
    fail_with: Option<u16>,
    latency: Option<Duration>,
    body_calls: AtomicUsize,
}

impl MockContentClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client preloaded with [`fixtures`] data.
    pub fn with_sample_data() -> Self {
        Self::new()
            .with_versions(vec![fixtures::kjv_version(), fixtures::spanish_version()])
            .with_books(fixtures::KJV, fixtures::books())
            .with_chapters(fixtures::KJV, fixtures::JOHN, fixtures::john_chapters())
            .with_body(fixtures::KJV, fixtures::JOHN_1, fixtures::john_1_body())
    }

    pub fn with_versions(mut self, versions: Vec<ContentVersion>) -> Self {
        self.versions = versions;
        self
    }

    pub fn with_books(mut self, version_id: &str, books: Vec<Book>) -> Self {
        self.books.insert(version_id.to_string(), books);
        self
    }

    pub fn with_chapters(mut self, version_id: &str, book_id: &str, chapters: Vec<Chapter>) -> Self {
        self.chapters
            .insert((version_id.to_string(), book_id.to_string()), chapters);
        self
    }

    pub fn with_body(mut self, version_id: &str, chapter_id: &str, body: ChapterBody) -> Self {
        self.bodies
            .insert((version_id.to_string(), chapter_id.to_string()), body);
        self
    }

    /// Fail every call with the given HTTP status.
    pub fn failing(mut self, status: u16) -> Self {
        self.fail_with = Some(status);
        self
    }

    /// Delay every call, so concurrent callers overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of `get_chapter_body` calls made so far.
    pub fn body_calls(&self) -> usize {
        self.body_calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, context: &str) -> UpstreamResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.fail_with {
            Some(status) => Err(UpstreamError::new(context, Some(status), "scripted failure")),
            None => Ok(()),
        }
    }
}

fn not_found(context: &str) -> UpstreamError {
    UpstreamError::new(context, Some(404), "Not Found")
}

#[async_trait]
impl ContentClient for MockContentClient {
    async fn list_versions(&self) -> UpstreamResult<Vec<ContentVersion>> {
        self.enter("list_versions").await?;
        Ok(self.versions.clone())
    }

    async fn list_books(&self, version_id: &str) -> UpstreamResult<Vec<Book>> {
        self.enter("list_books").await?;
        self.books
            .get(version_id)
            .cloned()
            .ok_or_else(|| not_found("list_books"))
    }

    async fn list_chapters(&self, version_id: &str, book_id: &str) -> UpstreamResult<Vec<Chapter>> {
        self.enter("list_chapters").await?;
        self.chapters
            .get(&(version_id.to_string(), book_id.to_string()))
            .cloned()
            .ok_or_else(|| not_found("list_chapters"))
    }

    async fn get_chapter_body(
        &self,
        version_id: &str,
        chapter_id: &str,
    ) -> UpstreamResult<ChapterBody> {
        self.body_calls.fetch_add(1, Ordering::SeqCst);
        self.enter("get_chapter_body").await?;
        self.bodies
            .get(&(version_id.to_string(), chapter_id.to_string()))
            .cloned()
            .ok_or_else(|| not_found("get_chapter_body"))
    }
}

// ============================================================================
// CLOCK AND STORE DOUBLES
// ============================================================================

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn at(now: Timestamp) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn starting_now() -> Self {
        Self::at(Utc::now())
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// [`InMemoryStore`] whose reads and removals can be made to fail.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: InMemoryStore,
    fail_reads: AtomicBool,
    fail_removes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    fn backend_error(op: &str) -> StoreError {
        StoreError::Backend {
            reason: format!("injected {op} failure"),
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::backend_error("read"));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(Self::backend_error("remove"));
        }
        self.inner.remove(key).await
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Sample upstream data.

    use super::*;

    pub const KJV: &str = "ENGKJV";
    pub const JOHN: &str = "JHN";
    pub const JOHN_1: &str = "JHN.1";
    pub const JOHN_1_KEY: &str = "bible-ENGKJV-JHN.1";

    pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    pub fn kjv_version() -> ContentVersion {
        ContentVersion {
            id: KJV.to_string(),
            name: "King James Version".to_string(),
            language: Language {
                id: Some("eng".to_string()),
                name: "English".to_string(),
            },
            abbreviation: Some("KJV".to_string()),
            description: None,
        }
    }

    pub fn spanish_version() -> ContentVersion {
        ContentVersion {
            id: "SPARVG".to_string(),
            name: "Reina Valera Gómez".to_string(),
            language: Language {
                id: Some("spa".to_string()),
                name: "Spanish".to_string(),
            },
            abbreviation: Some("RVG".to_string()),
            description: None,
        }
    }

    pub fn books() -> Vec<Book> {
        vec![
            Book {
                id: "GEN".to_string(),
                bible_id: KJV.to_string(),
                name: "Genesis".to_string(),
                abbreviation: Some("Gen".to_string()),
            },
            Book {
                id: JOHN.to_string(),
                bible_id: KJV.to_string(),
                name: "John".to_string(),
                abbreviation: Some("Jhn".to_string()),
            },
        ]
    }

    pub fn john_chapters() -> Vec<Chapter> {
        ["intro", "1", "2", "3"]
            .iter()
            .map(|number| {
                let id = if *number == "intro" {
                    "JHN.intro".to_string()
                } else {
                    format!("JHN.{number}")
                };
                Chapter {
                    reference: format!("John {number}"),
                    id,
                    bible_id: KJV.to_string(),
                    book_id: JOHN.to_string(),
                    number: number.to_string(),
                }
            })
            .collect()
    }

    pub fn john_1_body() -> ChapterBody {
        ChapterBody::from_content("<p>In the beginning was the Word...</p>")
            .with_id(JOHN_1)
            .with_reference("John 1")
    }

    /// Raw stored entry for `body` stamped at `timestamp_ms`.
    pub fn stored_entry(body: &ChapterBody, timestamp_ms: i64) -> String {
        serde_json::json!({ "data": body, "timestamp": timestamp_ms }).to_string()
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for ids and chapter bodies.

    use super::*;
    use proptest::prelude::*;

    /// Id that may contain the characters the key encoding must escape.
    pub fn arb_awkward_id() -> impl Strategy<Value = String> {
        "[A-Za-z0-9.%-]{1,16}"
    }

    pub fn arb_chapter_body() -> impl Strategy<Value = ChapterBody> {
        (
            "[ -~]{0,200}",
            proptest::option::of(arb_awkward_id()),
            proptest::option::of("[A-Za-z ]{1,20}"),
        )
            .prop_map(|(content, id, reference)| {
                let mut body = ChapterBody::from_content(content);
                body.id = id;
                body.reference = reference;
                body
            })
    }

    /// Age in milliseconds, up to 90 days.
    pub fn arb_age_millis() -> impl Strategy<Value = i64> {
        0i64..(90 * fixtures::DAY_MS)
    }
}
