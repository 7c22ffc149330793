//! Job Posting Extraction Library
//!
//! Turns a job posting (a URL, a pasted description, or a batch of either)
//! into a single structured [`ParsedJobData`] record.
//!
//! # Approach
//!
//! - Site adapters first: schema.org `JobPosting` JSON-LD and known job
//!   boards are read deterministically, with no model call
//! - LLM fallback for everything else, with tolerant JSON recovery
//! - Pages can be fetched locally or delegated to a headless-browser
//!   scrape worker, never both unless the caller opts in
//! - Batches run concurrently and report per-item outcomes
//!
//! # Usage
//!
//! ```rust,ignore
//! use job_extraction::{ContentParser, JobImporter, MemoryJobStore, UrlResolver};
//! use job_extraction::{ImportRequest, ImportSource};
//! use job_extraction::testing::MockAI;
//!
//! let parser = ContentParser::new(MockAI::new());
//! let importer = JobImporter::new(UrlResolver::new(parser), MemoryJobStore::new());
//!
//! let request = ImportRequest::new(ImportSource::Urls {
//!     urls: vec!["https://www.seek.co.nz/job/123".into()],
//! })
//! .save_immediately(true);
//! let response = importer.import("user-1", request).await?;
//! ```
//!
//! # Modules
//!
//! - [`adapters`] - Deterministic site adapters (schema.org, job boards)
//! - [`traits`] - Core trait abstractions (AI, PageFetcher, RemoteScraper, JobStore)
//! - [`types`] - Job record, configuration and import types
//! - [`pipeline`] - Parser, URL resolver and batch importer
//! - [`fetchers`] - HTTP fetcher and scrape worker client
//! - [`stores`] - Storage implementations (MemoryJobStore)
//! - [`security`] - Credential handling and SSRF protection
//! - [`testing`] - Mock implementations for testing

pub mod adapters;
pub mod ai;
pub mod error;
pub mod fetchers;
pub mod html;
pub mod json;
pub mod pipeline;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    Error, ExtractionError, FetchError, JsonParseError, Result, SecurityError, StoreError,
};
pub use json::parse_json_from_ai;
pub use traits::{
    ai::{CompletionRequest, AI},
    fetcher::{PageFetcher, RawPage, ValidatedFetcher},
    remote::{RemoteScraper, SCRAPE_STAGE_HEADER, STAGE_PARSE, STAGE_RENDER},
    store::JobStore,
};
pub use types::{
    config::{ParseOptions, ParserConfig, ResolveOptions},
    import::{ImportItem, ImportItemResult, ImportRequest, ImportResponse, ImportSource},
    job::{JobType, ParsedJobData, DEFAULT_CURRENCY},
};

// Re-export pipeline components
pub use pipeline::{
    format_extract_prompt, ContentParser, JobImporter, UrlResolver, EXTRACT_JOB_SYSTEM_PROMPT,
};

pub use adapters::{AdapterMatch, AdapterSet, Confidence, SiteAdapter};
pub use fetchers::{HttpFetcher, RemoteScraperClient};
pub use security::{AICredentials, UrlValidator};
pub use stores::MemoryJobStore;

#[cfg(feature = "openai")]
pub use ai::OpenAI;

// Re-export testing utilities
pub use testing::{MockAI, MockFetcher, MockRemoteScraper};
