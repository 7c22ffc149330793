//! Typed errors for the job extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Each stage of the
//! pipeline has its own error so callers can tell where a job failed.

use thiserror::Error;

use crate::types::job::ParsedJobData;

/// Maximum characters of the original input kept in a [`JsonParseError`].
pub const PREVIEW_CHARS: usize = 500;

/// All JSON recovery strategies failed.
#[derive(Debug, Clone, Error)]
#[error("could not parse JSON from AI output: {message} (input preview: {preview:?})")]
pub struct JsonParseError {
    /// First [`PREVIEW_CHARS`] characters of the original input
    pub preview: String,

    /// Message from the last parser attempt
    pub message: String,
}

impl JsonParseError {
    pub(crate) fn new(input: &str, message: impl Into<String>) -> Self {
        Self {
            preview: input.chars().take(PREVIEW_CHARS).collect(),
            message: message.into(),
        }
    }
}

/// Errors retrieving page content, locally or through the remote worker.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// URL failed SSRF validation
    #[error("blocked URL: {0}")]
    Blocked(#[from] SecurityError),

    /// Transport-level failure (DNS, connection reset, TLS)
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Target answered with a non-2xx status
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    /// Request timed out
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Remote scrape worker answered with a non-2xx status
    #[error("remote scraper returned {status}: {message}")]
    Remote { status: u16, message: String },

    /// Remote scrape worker answered 2xx with a body that is not a job record
    #[error("malformed remote scraper response: {0}")]
    MalformedResponse(String),
}

/// Content was available but no usable job record came out of it.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Nothing to parse
    #[error("content is empty")]
    EmptyContent,

    /// AI service unavailable or failed
    #[error("AI service error: {0}")]
    AI(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The model answered, but none of the JSON recovery passes worked
    #[error("LLM returned malformed output: {source}")]
    MalformedOutput {
        raw_preview: String,
        #[source]
        source: JsonParseError,
    },

    /// A record was produced but misses title and/or company
    #[error("extracted record is missing required fields: {}", missing.join(", "))]
    IncompleteRecord {
        missing: Vec<&'static str>,
        partial: Box<ParsedJobData>,
    },

    /// The remote worker rendered the page but could not extract a job from it
    #[error("remote scraper could not extract a job: {message}")]
    Remote { message: String },
}

impl ExtractionError {
    /// Best-effort partial data for diagnostics, when any was produced.
    pub fn partial(&self) -> Option<&ParsedJobData> {
        match self {
            ExtractionError::IncompleteRecord { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// Security-related errors, primarily for SSRF protection.
#[derive(Debug, Clone, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, internal IPs)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    DnsResolution(String),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Persistence collaborator failed.
#[derive(Debug, Error)]
#[error("storage error: {0}")]
pub struct StoreError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

/// Top-level error for URL and import paths.
///
/// The message names the stage that failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// Batch import request carried no URLs and no content
    #[error("import request contains no items")]
    EmptyBatch,
}

/// Result type alias for top-level operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for content extraction.
pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;
