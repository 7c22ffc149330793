//! Site adapters: structured extraction without a language model.
//!
//! Adapters are tried in registration order and the first one that
//! returns a record wins:
//!
//! 1. [`SchemaOrgAdapter`] - `application/ld+json` `JobPosting` blocks
//! 2. [`DomainAdapter`]s - CSS selectors for known job boards, keyed by host
//! 3. [`PageTitleAdapter`] - the page `<title>`, always matches, low confidence
//!
//! # Example
//!
//! ```rust,ignore
//! use job_extraction::adapters::AdapterSet;
//!
//! let adapters = AdapterSet::default();
//! let found = adapters.run(&html, Some("https://www.seek.co.nz/job/123"));
//! if found.is_authoritative() {
//!     // title + company from structured data, no LLM call needed
//! }
//! ```

mod domains;
mod page_title;
mod schema_org;

pub use domains::{default_domain_adapters, DomainAdapter};
pub use page_title::PageTitleAdapter;
pub use schema_org::SchemaOrgAdapter;

use scraper::{Html, Selector};
use tracing::debug;

use crate::html::clean_text;
use crate::types::job::ParsedJobData;

/// How much a match can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Structured data or a selector set written for this site
    High,
    /// Generic signal only (page title)
    Low,
}

/// A record produced by an adapter.
#[derive(Debug, Clone)]
pub struct AdapterMatch {
    /// Name of the adapter that produced the record
    pub adapter: String,
    pub confidence: Confidence,
    pub data: ParsedJobData,
}

impl AdapterMatch {
    /// High confidence and carries title + company; safe to return as-is.
    pub fn is_authoritative(&self) -> bool {
        self.confidence == Confidence::High && self.data.is_viable()
    }
}

/// Parsed page handed to each adapter.
pub struct PageSnapshot {
    document: Html,
    host: Option<String>,
}

impl PageSnapshot {
    /// Parse `content` and work out which host it belongs to.
    ///
    /// The host comes from `source_url` when given, otherwise from the
    /// page's canonical link or `og:url`.
    pub fn parse(content: &str, source_url: Option<&str>) -> Self {
        let document = Html::parse_document(content);
        let host = source_url
            .and_then(host_of)
            .or_else(|| declared_url(&document).as_deref().and_then(host_of));
        Self { document, host }
    }

    /// The parsed DOM.
    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Lower-cased host name, if known.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Text of the first element matching any selector, tried in order.
    ///
    /// Selectors that fail to parse or match only whitespace are skipped.
    pub fn first_text(&self, selectors: &[&str]) -> Option<String> {
        selectors.iter().find_map(|selector_str| {
            let selector = Selector::parse(selector_str).ok()?;
            self.document
                .select(&selector)
                .map(|element| clean_text(&element.text().collect::<Vec<_>>().join(" ")))
                .find(|text| !text.is_empty())
        })
    }

    /// Value of `attr` on the first element matching `selector`.
    pub fn first_attr(&self, selector: &str, attr: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        self.document
            .select(&selector)
            .filter_map(|element| element.value().attr(attr))
            .map(clean_text)
            .find(|value| !value.is_empty())
    }
}

fn host_of(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

fn declared_url(document: &Html) -> Option<String> {
    let candidates = [
        ("link[rel='canonical']", "href"),
        ("meta[property='og:url']", "content"),
    ];
    candidates.iter().find_map(|(selector, attr)| {
        let selector = Selector::parse(selector).ok()?;
        document
            .select(&selector)
            .find_map(|el| el.value().attr(attr).map(str::to_string))
    })
}

/// A structured extractor for one kind of page.
///
/// `extract` returns `None` for "not my page"; it must not panic or
/// error on malformed input it does not recognize.
pub trait SiteAdapter: Send + Sync {
    /// Adapter name (for logging/debugging).
    fn name(&self) -> &str;

    /// Cheap pre-check, typically a host match.
    fn applies_to(&self, _page: &PageSnapshot) -> bool {
        true
    }

    /// Try to build a record from the page.
    fn extract(&self, page: &PageSnapshot) -> Option<ParsedJobData>;
}

/// Ordered adapter chain with the page-title fallback pinned last.
pub struct AdapterSet {
    adapters: Vec<Box<dyn SiteAdapter>>,
    fallback: PageTitleAdapter,
}

impl Default for AdapterSet {
    fn default() -> Self {
        let mut set = Self::empty().register(SchemaOrgAdapter);
        for adapter in default_domain_adapters() {
            set = set.register(adapter);
        }
        set
    }
}

impl AdapterSet {
    /// Only the page-title fallback.
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
            fallback: PageTitleAdapter,
        }
    }

    /// Append an adapter; it runs after those already registered and
    /// before the page-title fallback.
    pub fn register(mut self, adapter: impl SiteAdapter + 'static) -> Self {
        self.adapters.push(Box::new(adapter));
        self
    }

    /// Names of the registered adapters, in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.adapters
            .iter()
            .map(|a| a.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }

    /// Run the chain over raw content. Always yields a match.
    pub fn run(&self, content: &str, source_url: Option<&str>) -> AdapterMatch {
        let page = PageSnapshot::parse(content, source_url);
        self.run_on(&page)
    }

    /// Run the chain over an already parsed page.
    pub fn run_on(&self, page: &PageSnapshot) -> AdapterMatch {
        for adapter in &self.adapters {
            if !adapter.applies_to(page) {
                continue;
            }
            if let Some(data) = adapter.extract(page) {
                debug!(adapter = adapter.name(), host = ?page.host(), "adapter matched");
                return AdapterMatch {
                    adapter: adapter.name().to_string(),
                    confidence: Confidence::High,
                    data,
                };
            }
        }

        debug!(host = ?page.host(), "no structured adapter matched, using page title");
        AdapterMatch {
            adapter: self.fallback.name().to_string(),
            confidence: Confidence::Low,
            data: self.fallback.extract(page).unwrap_or_default(),
        }
    }
}
