//! Client for the remote scrape worker.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{ExtractionError, FetchError, Result};
use crate::traits::remote::{RemoteScraper, SCRAPE_STAGE_HEADER, STAGE_PARSE};
use crate::types::job::ParsedJobData;

/// Browser launch + navigation + LLM call; well above a plain fetch.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Calls `GET <scraper_url>?url=<target>&language=<lang>`.
///
/// A 2xx answer must be a JSON job record. A failure marked with the
/// parse stage header becomes [`ExtractionError::Remote`]; any other
/// failure becomes a [`FetchError`] carrying the worker's plain-text message.
#[derive(Debug, Clone)]
pub struct RemoteScraperClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for RemoteScraperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteScraperClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom HTTP client.
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
impl RemoteScraper for RemoteScraperClient {
    async fn scrape(
        &self,
        scraper_url: &str,
        target_url: &str,
        language: Option<&str>,
    ) -> Result<ParsedJobData> {
        let mut endpoint = url::Url::parse(scraper_url).map_err(|_| FetchError::InvalidUrl {
            url: scraper_url.to_string(),
        })?;
        {
            let mut query = endpoint.query_pairs_mut();
            query.append_pair("url", target_url);
            if let Some(language) = language {
                query.append_pair("language", language);
            }
        }

        debug!(scraper = %scraper_url, url = %target_url, "delegating to remote scraper");
        let response = self
            .client
            .get(endpoint)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                warn!(scraper = %scraper_url, error = %e, "remote scraper request failed");
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: scraper_url.to_string(),
                    }
                } else {
                    FetchError::Http {
                        url: scraper_url.to_string(),
                        source: Box::new(e),
                    }
                }
            })?;

        let status = response.status();
        let parse_stage = response
            .headers()
            .get(SCRAPE_STAGE_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case(STAGE_PARSE));
        let body = response.text().await.map_err(|e| FetchError::Http {
            url: scraper_url.to_string(),
            source: Box::new(e),
        })?;

        if !status.is_success() {
            warn!(
                scraper = %scraper_url,
                status = %status,
                parse_stage,
                message = %body,
                "remote scraper failed"
            );
            let message = body.trim().to_string();
            if parse_stage {
                return Err(ExtractionError::Remote { message }.into());
            }
            return Err(FetchError::Remote {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let data = serde_json::from_str::<ParsedJobData>(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            FetchError::MalformedResponse(format!("{} (body: {:?})", e, preview))
        })?;
        Ok(data)
    }
}
