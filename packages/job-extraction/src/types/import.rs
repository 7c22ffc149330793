//! Request and response shapes for batch job imports.

use serde::{Deserialize, Serialize};

use super::job::ParsedJobData;

/// What the caller wants imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportSource {
    /// A single posting URL
    Url { url: String },

    /// Several posting URLs
    Urls { urls: Vec<String> },

    /// Already-rendered page content (e.g. from the browser extension)
    Content { content: String },
}

/// One item of a batch, after fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportItem {
    Url(String),
    Content(String),
}

impl ImportItem {
    /// Short description of the input, echoed back in the result.
    pub fn describe(&self) -> String {
        match self {
            ImportItem::Url(url) => url.clone(),
            ImportItem::Content(content) => {
                let preview: String = content.chars().take(80).collect();
                if content.chars().count() > 80 {
                    format!("content: {}...", preview)
                } else {
                    format!("content: {}", preview)
                }
            }
        }
    }
}

impl ImportSource {
    /// Flatten into individual items, preserving order.
    pub fn into_items(self) -> Vec<ImportItem> {
        match self {
            ImportSource::Url { url } => vec![ImportItem::Url(url)],
            ImportSource::Urls { urls } => urls.into_iter().map(ImportItem::Url).collect(),
            ImportSource::Content { content } => vec![ImportItem::Content(content)],
        }
    }
}

/// Batch import request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    #[serde(flatten)]
    pub source: ImportSource,

    /// Persist each viable record right away
    #[serde(default)]
    pub save_immediately: bool,

    /// Output language hint
    #[serde(default)]
    pub language: Option<String>,

    /// Remote worker for URL items
    #[serde(default)]
    pub scraper_url: Option<String>,
}

impl ImportRequest {
    /// Create a request that does not persist anything.
    pub fn new(source: ImportSource) -> Self {
        Self {
            source,
            save_immediately: false,
            language: None,
            scraper_url: None,
        }
    }

    /// Persist viable records through the job store.
    pub fn save_immediately(mut self, save: bool) -> Self {
        self.save_immediately = save;
        self
    }

    /// Route URL items through a remote worker.
    pub fn with_scraper_url(mut self, url: impl Into<String>) -> Self {
        self.scraper_url = Some(url.into());
        self
    }
}

/// Outcome for one item of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportItemResult {
    pub success: bool,

    /// The URL, or a short preview of the content
    pub input: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_data: Option<ParsedJobData>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportItemResult {
    pub fn succeeded(input: String, data: ParsedJobData, job_id: Option<String>) -> Self {
        Self {
            success: true,
            input,
            job_id,
            parsed_data: Some(data),
            error: None,
        }
    }

    pub fn failed(input: String, error: impl Into<String>) -> Self {
        Self {
            success: false,
            input,
            job_id: None,
            parsed_data: None,
            error: Some(error.into()),
        }
    }
}

/// Aggregate batch response, one result per input item in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    /// True when at least one item succeeded
    pub success: bool,
    pub results: Vec<ImportItemResult>,
}

impl ImportResponse {
    pub fn from_results(results: Vec<ImportItemResult>) -> Self {
        Self {
            success: results.iter().any(|r| r.success),
            results,
        }
    }

    /// Number of failed items.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }
}
