//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the job extraction
//! library without making real AI or network calls. Every mock is cheap to
//! clone and clones share state, so a test can hand one copy to the
//! pipeline and keep another for assertions.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use crate::error::{ExtractionError, ExtractionResult, FetchError, FetchResult, Result};
use crate::traits::{
    ai::{CompletionRequest, AI},
    fetcher::{PageFetcher, RawPage},
    remote::RemoteScraper,
};
use crate::types::job::ParsedJobData;

/// A mock AI implementation for testing.
///
/// Responses keyed with [`with_response_for`](Self::with_response_for) are
/// matched against the user prompt first, which keeps concurrent batch
/// tests deterministic. Otherwise queued responses are returned in order.
#[derive(Clone, Default)]
pub struct MockAI {
    /// Responses returned in call order
    queued: Arc<RwLock<VecDeque<String>>>,

    /// Responses chosen by a substring of the user prompt
    keyed: Arc<RwLock<Vec<(String, String)>>>,

    /// When set, every call fails with this message
    failure: Arc<RwLock<Option<String>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<CompletionRequest>>>,
}

impl MockAI {
    /// Create a new mock AI with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.queued.write().unwrap().push_back(response.into());
        self
    }

    /// Answer any prompt containing `needle` with `response`.
    pub fn with_response_for(self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.keyed
            .write()
            .unwrap()
            .push((needle.into(), response.into()));
        self
    }

    /// Make every call fail.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.failure.write().unwrap() = Some(message.into());
        self
    }

    /// Get all requests made to this mock.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.read().unwrap().clone()
    }

    /// Number of completions requested.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl AI for MockAI {
    async fn complete(&self, request: &CompletionRequest) -> ExtractionResult<String> {
        self.calls.write().unwrap().push(request.clone());

        if let Some(message) = self.failure.read().unwrap().clone() {
            return Err(ExtractionError::AI(Box::new(std::io::Error::other(message))));
        }

        let keyed = self
            .keyed
            .read()
            .unwrap()
            .iter()
            .find(|(needle, _)| request.user.contains(needle.as_str()))
            .map(|(_, response)| response.clone());
        if let Some(response) = keyed {
            return Ok(response);
        }

        self.queued.write().unwrap().pop_front().ok_or_else(|| {
            ExtractionError::AI(Box::new(std::io::Error::other("no scripted response")))
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A mock page fetcher for testing.
///
/// Unknown URLs answer with HTTP 404.
#[derive(Clone, Default)]
pub struct MockFetcher {
    /// Predefined pages by URL
    pages: Arc<RwLock<HashMap<String, RawPage>>>,

    /// URLs that answer with an error status
    statuses: Arc<RwLock<HashMap<String, u16>>>,

    /// Requested URLs, in order
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for `url`.
    pub fn with_page(self, url: impl Into<String>, content: impl Into<String>) -> Self {
        let url = url.into();
        let page = RawPage::new(url.clone(), content).with_content_type("text/html");
        self.pages.write().unwrap().insert(url, page);
        self
    }

    /// Serve a fully specified page.
    pub fn with_raw_page(self, page: RawPage) -> Self {
        self.pages.write().unwrap().insert(page.url.clone(), page);
        self
    }

    /// Answer `url` with an error status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.statuses.write().unwrap().insert(url.into(), status);
        self
    }

    /// URLs fetched so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.read().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<RawPage> {
        self.requests.write().unwrap().push(url.to_string());

        if let Some(status) = self.statuses.read().unwrap().get(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            });
        }

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Record of a call made to the mock remote scraper.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    pub scraper_url: String,
    pub target_url: String,
    pub language: Option<String>,
}

#[derive(Debug, Clone)]
enum RemoteFailure {
    Render { status: u16, message: String },
    Parse { message: String },
}

/// A mock remote scrape worker.
///
/// Unknown target URLs answer like a worker that failed to scrape.
#[derive(Clone, Default)]
pub struct MockRemoteScraper {
    /// Predefined records by target URL
    jobs: Arc<RwLock<HashMap<String, ParsedJobData>>>,

    /// Target URLs that fail
    failures: Arc<RwLock<HashMap<String, RemoteFailure>>>,

    /// Call tracking
    calls: Arc<RwLock<Vec<RemoteCall>>>,
}

impl MockRemoteScraper {
    /// Create a new mock remote scraper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `job` for `target_url`.
    pub fn with_job(self, target_url: impl Into<String>, job: ParsedJobData) -> Self {
        self.jobs.write().unwrap().insert(target_url.into(), job);
        self
    }

    /// Fail `target_url` before a page was rendered.
    pub fn with_failure(
        self,
        target_url: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        self.failures.write().unwrap().insert(
            target_url.into(),
            RemoteFailure::Render {
                status,
                message: message.into(),
            },
        );
        self
    }

    /// Fail `target_url` after rendering, as if no job could be extracted.
    pub fn with_parse_failure(
        self,
        target_url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.failures.write().unwrap().insert(
            target_url.into(),
            RemoteFailure::Parse {
                message: message.into(),
            },
        );
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl RemoteScraper for MockRemoteScraper {
    async fn scrape(
        &self,
        scraper_url: &str,
        target_url: &str,
        language: Option<&str>,
    ) -> Result<ParsedJobData> {
        self.calls.write().unwrap().push(RemoteCall {
            scraper_url: scraper_url.to_string(),
            target_url: target_url.to_string(),
            language: language.map(str::to_string),
        });

        if let Some(failure) = self.failures.read().unwrap().get(target_url) {
            return Err(match failure.clone() {
                RemoteFailure::Render { status, message } => {
                    FetchError::Remote { status, message }.into()
                }
                RemoteFailure::Parse { message } => ExtractionError::Remote { message }.into(),
            });
        }

        let job = self.jobs.read().unwrap().get(target_url).cloned();
        job.ok_or_else(|| {
            FetchError::Remote {
                status: 500,
                message: format!("Scraping failed: no page for {}", target_url),
            }
            .into()
        })
    }
}
