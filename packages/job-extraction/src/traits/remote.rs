//! Remote scrape worker trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::job::ParsedJobData;

/// Response header the worker sets on failures to say which step failed.
pub const SCRAPE_STAGE_HEADER: &str = "x-scrape-stage";

/// Stage value for failures after the page was rendered.
pub const STAGE_PARSE: &str = "parse";

/// Stage value for failures while reaching or rendering the page.
pub const STAGE_RENDER: &str = "render";

/// A headless-browser worker that fetches and parses a URL itself.
///
/// The worker answers with a finished record, so the caller does not
/// run the parser again. Failures to reach the page come back as
/// [`Error::Fetch`](crate::error::Error::Fetch); a page that rendered
/// but held no usable job comes back as
/// [`Error::Extraction`](crate::error::Error::Extraction).
#[async_trait]
pub trait RemoteScraper: Send + Sync {
    /// Ask the worker at `scraper_url` to scrape `target_url`.
    async fn scrape(
        &self,
        scraper_url: &str,
        target_url: &str,
        language: Option<&str>,
    ) -> Result<ParsedJobData>;
}
