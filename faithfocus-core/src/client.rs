//! The content client seam.

use async_trait::async_trait;

use crate::content::{Book, Chapter, ChapterBody, ContentVersion};
use crate::error::UpstreamResult;

/// Read access to the upstream scripture API.
///
/// Each call performs exactly one upstream request with no retries. Every
/// failure, whether transport, non-success status or malformed body, is
/// reported as [`UpstreamError`](crate::UpstreamError).
///
/// Identifiers must be non-empty and not whitespace-only. Such ids are
/// rejected with `status: None` before any request is made.
///
/// Implementations must not cache; caching is layered on top by the
/// chapter cache.
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// List every version the upstream offers, unfiltered.
    async fn list_versions(&self) -> UpstreamResult<Vec<ContentVersion>>;

    /// List the books of a version. `version_id` must be non-empty.
    async fn list_books(&self, version_id: &str) -> UpstreamResult<Vec<Book>>;

    /// List the chapters of a book. Both identifiers must be non-empty.
    async fn list_chapters(&self, version_id: &str, book_id: &str)
        -> UpstreamResult<Vec<Chapter>>;

    /// Fetch the text of one chapter. Both identifiers must be non-empty.
    async fn get_chapter_body(&self, version_id: &str, chapter_id: &str)
        -> UpstreamResult<ChapterBody>;
}

#[async_trait]
impl<T: ContentClient + ?Sized> ContentClient for std::sync::Arc<T> {
    async fn list_versions(&self) -> UpstreamResult<Vec<ContentVersion>> {
        (**self).list_versions().await
    }

    async fn list_books(&self, version_id: &str) -> UpstreamResult<Vec<Book>> {
        (**self).list_books(version_id).await
    }

    async fn list_chapters(
        &self,
        version_id: &str,
        book_id: &str,
    ) -> UpstreamResult<Vec<Chapter>> {
        (**self).list_chapters(version_id, book_id).await
    }

    async fn get_chapter_body(
        &self,
        version_id: &str,
        chapter_id: &str,
    ) -> UpstreamResult<ChapterBody> {
        (**self).get_chapter_body(version_id, chapter_id).await
    }
}
