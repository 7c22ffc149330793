//! Page fetcher trait for local retrieval.
//!
//! # Usage
//!
//! ```rust,ignore
//! use job_extraction::fetchers::HttpFetcher;
//! use job_extraction::traits::fetcher::{PageFetcher, ValidatedFetcher};
//!
//! let fetcher = ValidatedFetcher::new(HttpFetcher::new());
//! let page = fetcher.fetch("https://www.seek.co.nz/job/123").await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FetchError, FetchResult};
use crate::security::UrlValidator;

/// Raw page content as fetched, before any parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
    /// URL that was requested
    pub url: String,

    /// URL after redirects, when it differs
    pub final_url: Option<String>,

    /// Response body (HTML or text)
    pub content: String,

    /// Response `content-type`
    pub content_type: Option<String>,

    /// HTTP status
    pub status: u16,

    /// When the content was fetched
    pub fetched_at: DateTime<Utc>,
}

impl RawPage {
    /// Create a 200 page with minimal fields.
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            final_url: None,
            content: content.into(),
            content_type: None,
            status: 200,
            fetched_at: Utc::now(),
        }
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Record the post-redirect URL.
    pub fn with_final_url(mut self, final_url: impl Into<String>) -> Self {
        self.final_url = Some(final_url.into());
        self
    }

    /// Check if this page has content.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// The URL the content actually came from.
    pub fn effective_url(&self) -> &str {
        self.final_url.as_deref().unwrap_or(&self.url)
    }
}

/// Retrieves a single page by URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one URL. Non-2xx answers are errors.
    async fn fetch(&self, url: &str) -> FetchResult<RawPage>;
}

/// A fetcher that validates URLs before fetching.
///
/// Wraps any fetcher to reject private, loopback and link-local
/// targets (including hostnames that resolve to them) and non-http(s)
/// schemes. The final URL after redirects is re-checked; the
/// [`HttpFetcher`](crate::fetchers::HttpFetcher) also refuses blocked
/// hops before following them.
pub struct ValidatedFetcher<F: PageFetcher> {
    inner: F,
    validator: UrlValidator,
}

impl<F: PageFetcher> ValidatedFetcher<F> {
    /// Create a new validated fetcher with default security rules.
    pub fn new(fetcher: F) -> Self {
        Self {
            inner: fetcher,
            validator: UrlValidator::new(),
        }
    }

    /// Create with a custom validator.
    pub fn with_validator(fetcher: F, validator: UrlValidator) -> Self {
        Self {
            inner: fetcher,
            validator,
        }
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for ValidatedFetcher<F> {
    async fn fetch(&self, url: &str) -> FetchResult<RawPage> {
        self.validator.validate_with_dns(url).await?;

        let page = self.inner.fetch(url).await?;

        if let Some(final_url) = &page.final_url {
            self.validator
                .validate(final_url)
                .map_err(FetchError::Blocked)?;
        }

        Ok(page)
    }
}
