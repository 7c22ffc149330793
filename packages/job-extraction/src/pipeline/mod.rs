//! Extraction pipeline.
//!
//! - [`ContentParser`]: raw content to record (adapters, then LLM)
//! - [`UrlResolver`]: URL to record (local fetch or remote worker)
//! - [`JobImporter`]: batches of URLs/content with per-item outcomes

pub mod import;
pub mod parse;
pub mod prompts;
pub mod resolve;

pub use import::JobImporter;
pub use parse::ContentParser;
pub use prompts::{format_extract_prompt, EXTRACT_JOB_SYSTEM_PROMPT};
pub use resolve::UrlResolver;
