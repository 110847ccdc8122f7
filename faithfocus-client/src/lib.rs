//! HTTP client for the upstream scripture API.
//!
//! [`ScriptureApiClient`] implements [`ContentClient`] over reqwest. Each
//! call is one `GET`, unwrapped from the upstream `{ "data": ... }` envelope.
//! Every failure is reported as [`UpstreamError`].

use async_trait::async_trait;
use faithfocus_core::{
    ApiConfig, Book, Chapter, ChapterBody, ContentClient, ContentVersion, Envelope, UpstreamError,
    UpstreamResult,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "api-key";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Config error: {0}")]
    Config(String),
}

/// Error body returned by the upstream on non-success statuses.
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// reqwest-backed [`ContentClient`].
#[derive(Debug, Clone)]
pub struct ScriptureApiClient {
    client: reqwest::Client,
    base_url: Url,
    auth_header: HeaderMap,
}

impl ScriptureApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiClientError> {
        config
            .validate()
            .map_err(|e| ApiClientError::Config(e.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| ApiClientError::Config(format!("invalid base_url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiClientError::Config(format!(
                "base_url cannot carry a path: {}",
                base_url
            )));
        }

        let auth_header = build_auth_headers(config.api_key.as_deref())?;
        if auth_header.is_empty() {
            warn!("no api key configured; upstream requests will be unauthorized");
        }

        Ok(Self {
            client,
            base_url,
            auth_header,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, context: &str, segments: &[&str]) -> UpstreamResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::invalid_argument(context, "base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_data<T>(&self, context: &str, segments: &[&str]) -> UpstreamResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(context, segments)?;
        debug!(%url, context, "upstream request");

        let result = match self
            .client
            .get(url)
            .headers(self.auth_header.clone())
            .send()
            .await
        {
            Ok(response) => self.parse_response(context, response).await,
            Err(e) => Err(UpstreamError::new(
                context,
                e.status().map(|s| s.as_u16()),
                e.to_string(),
            )),
        };

        result.inspect_err(|e| warn!(error = %e, "upstream request failed"))
    }

    async fn parse_response<T: DeserializeOwned>(
        &self,
        context: &str,
        response: reqwest::Response,
    ) -> UpstreamResult<T> {
        let status = response.status();
        let code = Some(status.as_u16());
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::new(context, code, e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str::<Envelope<T>>(&text)
                .map(Envelope::into_data)
                .map_err(|e| {
                    UpstreamError::new(context, code, format!("malformed response body: {}", e))
                });
        }

        let reason = match serde_json::from_str::<UpstreamErrorBody>(&text) {
            Ok(UpstreamErrorBody {
                error: Some(error),
                message: Some(message),
            }) => format!("{}: {}", error, message),
            Ok(UpstreamErrorBody {
                error: None,
                message: Some(message),
            }) => message,
            _ if !text.trim().is_empty() => text,
            _ => status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
        };
        Err(UpstreamError::new(context, code, reason))
    }
}

fn require_id(context: &str, field: &str, value: &str) -> UpstreamResult<()> {
    if value.trim().is_empty() {
        return Err(UpstreamError::invalid_argument(
            context,
            format!("{} must not be empty", field),
        ));
    }
    Ok(())
}

#[async_trait]
impl ContentClient for ScriptureApiClient {
    async fn list_versions(&self) -> UpstreamResult<Vec<ContentVersion>> {
        self.get_data("list_versions", &["bibles"]).await
    }

    async fn list_books(&self, version_id: &str) -> UpstreamResult<Vec<Book>> {
        let context = format!("list_books {}", version_id);
        require_id(&context, "version_id", version_id)?;
        self.get_data(&context, &["bibles", version_id, "books"])
            .await
    }

    async fn list_chapters(
        &self,
        version_id: &str,
        book_id: &str,
    ) -> UpstreamResult<Vec<Chapter>> {
        let context = format!("list_chapters {}/{}", version_id, book_id);
        require_id(&context, "version_id", version_id)?;
        require_id(&context, "book_id", book_id)?;
        self.get_data(&context, &["bibles", version_id, "books", book_id, "chapters"])
            .await
    }

    async fn get_chapter_body(
        &self,
        version_id: &str,
        chapter_id: &str,
    ) -> UpstreamResult<ChapterBody> {
        let context = format!("get_chapter_body {}/{}", version_id, chapter_id);
        require_id(&context, "version_id", version_id)?;
        require_id(&context, "chapter_id", chapter_id)?;
        self.get_data(&context, &["bibles", version_id, "chapters", chapter_id])
            .await
    }
}

fn build_auth_headers(api_key: Option<&str>) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) {
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(api_key).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    Ok(headers)
}
