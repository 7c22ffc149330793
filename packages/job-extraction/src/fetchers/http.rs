//! Direct HTTP fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult, SecurityError};
use crate::security::UrlValidator;
use crate::traits::fetcher::{PageFetcher, RawPage};

/// User agent sent by default; job boards reject obvious bots outright.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_REDIRECTS: usize = 10;

/// Fetches a single page with reqwest.
///
/// Every redirect hop is checked against a [`UrlValidator`] before it is
/// followed, so a public page cannot bounce the request into a private
/// range. The default rules are [`UrlValidator::new`].
///
/// # Example
///
/// ```rust,ignore
/// use job_extraction::fetchers::HttpFetcher;
/// use job_extraction::traits::fetcher::ValidatedFetcher;
///
/// let fetcher = ValidatedFetcher::new(HttpFetcher::new());
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
    timeout: Duration,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a new fetcher with default settings.
    pub fn new() -> Self {
        Self {
            client: guarded_client(UrlValidator::new()),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Check redirect hops against `validator` instead of the defaults.
    pub fn with_redirect_validator(mut self, validator: UrlValidator) -> Self {
        self.client = guarded_client(validator);
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a custom HTTP client.
    ///
    /// The client's own redirect policy replaces the per-hop check.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<RawPage> {
        let parsed = url::Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        debug!(url = %url, "HTTP fetch starting");
        let response = self
            .client
            .get(parsed)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "HTTP fetch returned non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(url, e))?;

        debug!(url = %url, bytes = body.len(), "HTTP fetch complete");

        let mut page = RawPage::new(url, body);
        page.status = status.as_u16();
        if final_url != url {
            page = page.with_final_url(final_url);
        }
        if let Some(ct) = content_type {
            page = page.with_content_type(ct);
        }
        Ok(page)
    }
}

fn guarded_client(validator: UrlValidator) -> reqwest::Client {
    let policy = Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        let verdict = validator.validate(attempt.url().as_str());
        match verdict {
            Ok(()) => attempt.follow(),
            Err(e) => attempt.error(e),
        }
    });

    reqwest::Client::builder()
        .redirect(policy)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "guarded HTTP client unavailable, not following redirects");
            reqwest::Client::builder()
                .redirect(Policy::none())
                .build()
                .unwrap_or_default()
        })
}

/// The validator's verdict, when a redirect hop was refused.
fn blocked_redirect(e: &reqwest::Error) -> Option<SecurityError> {
    if !e.is_redirect() {
        return None;
    }
    let mut source = std::error::Error::source(e);
    while let Some(err) = source {
        if let Some(blocked) = err.downcast_ref::<SecurityError>() {
            return Some(blocked.clone());
        }
        source = std::error::Error::source(err);
    }
    None
}

fn transport_error(url: &str, e: reqwest::Error) -> FetchError {
    if let Some(blocked) = blocked_redirect(&e) {
        warn!(url = %url, error = %blocked, "redirect target blocked");
        return FetchError::Blocked(blocked);
    }
    if e.is_timeout() {
        warn!(url = %url, "HTTP fetch timed out");
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        warn!(url = %url, error = %e, "HTTP request failed");
        FetchError::Http {
            url: url.to_string(),
            source: Box::new(e),
        }
    }
}
