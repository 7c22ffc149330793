//! URL resolver: fetch (locally or through a worker), then parse.

use tracing::{debug, info, warn};

use crate::error::{Error, ExtractionError, FetchError, Result};
use crate::fetchers::{HttpFetcher, RemoteScraperClient};
use crate::pipeline::parse::ContentParser;
use crate::traits::ai::AI;
use crate::traits::fetcher::{PageFetcher, ValidatedFetcher};
use crate::traits::remote::RemoteScraper;
use crate::types::config::{ParseOptions, ResolveOptions};
use crate::types::job::ParsedJobData;

/// Turns a job posting URL into a validated record.
///
/// With `scraper_url` set the target URL is only ever requested by the
/// remote worker; a worker failure is returned as-is unless the caller
/// opted in to `allow_local_fallback`, and even then only failures to
/// reach the page fall back. A page the worker rendered but could not
/// extract from is reported, not fetched again. Without it the page is fetched
/// directly and handed to the [`ContentParser`].
///
/// # Example
///
/// ```rust,ignore
/// let resolver = UrlResolver::new(ContentParser::new(ai));
/// let job = resolver
///     .resolve(url, &ResolveOptions::new().with_scraper_url("https://scraper.internal/"))
///     .await?;
/// ```
pub struct UrlResolver<
    A: AI,
    F: PageFetcher = ValidatedFetcher<HttpFetcher>,
    R: RemoteScraper = RemoteScraperClient,
> {
    parser: ContentParser<A>,
    fetcher: F,
    remote: R,
}

impl<A: AI> UrlResolver<A> {
    /// SSRF-validated HTTP fetcher and the reqwest worker client.
    pub fn new(parser: ContentParser<A>) -> Self {
        Self {
            parser,
            fetcher: ValidatedFetcher::new(HttpFetcher::new()),
            remote: RemoteScraperClient::new(),
        }
    }
}

impl<A: AI, F: PageFetcher, R: RemoteScraper> UrlResolver<A, F, R> {
    /// Swap the local fetcher.
    pub fn with_fetcher<F2: PageFetcher>(self, fetcher: F2) -> UrlResolver<A, F2, R> {
        UrlResolver {
            parser: self.parser,
            fetcher,
            remote: self.remote,
        }
    }

    /// Swap the remote worker client.
    pub fn with_remote<R2: RemoteScraper>(self, remote: R2) -> UrlResolver<A, F, R2> {
        UrlResolver {
            parser: self.parser,
            fetcher: self.fetcher,
            remote,
        }
    }

    /// The parser used for locally fetched pages.
    pub fn parser(&self) -> &ContentParser<A> {
        &self.parser
    }

    /// Resolve `url` into a record with `application_url` set.
    pub async fn resolve(&self, url: &str, options: &ResolveOptions) -> Result<ParsedJobData> {
        if url::Url::parse(url).is_err() {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            }
            .into());
        }

        let data = match options.scraper_url.as_deref() {
            Some(scraper_url) => match self.delegate(scraper_url, url, options).await {
                Ok(data) => data,
                Err(Error::Fetch(e)) if options.allow_local_fallback => {
                    warn!(url = %url, error = %e, "remote scraper failed, falling back to local fetch");
                    self.fetch_and_parse(url, options).await?
                }
                Err(e) => return Err(e),
            },
            None => self.fetch_and_parse(url, options).await?,
        };

        Ok(data.with_application_url_fallback(url))
    }

    async fn delegate(
        &self,
        scraper_url: &str,
        url: &str,
        options: &ResolveOptions,
    ) -> Result<ParsedJobData> {
        info!(url = %url, scraper = %scraper_url, "resolving via remote scraper");
        let data = self
            .remote
            .scrape(scraper_url, url, options.language.as_deref())
            .await?
            .normalized(&self.parser.config().default_currency);

        // The worker validates too, but its answer is not trusted blindly.
        let missing = data.missing_required();
        if !missing.is_empty() {
            return Err(ExtractionError::IncompleteRecord {
                missing,
                partial: Box::new(data),
            }
            .into());
        }
        Ok(data)
    }

    async fn fetch_and_parse(&self, url: &str, options: &ResolveOptions) -> Result<ParsedJobData> {
        info!(url = %url, "resolving via local fetch");
        let page = self.fetcher.fetch(url).await?;
        debug!(url = %url, bytes = page.content.len(), status = page.status, "page fetched");

        let parse_options = ParseOptions {
            source_url: Some(url.to_string()),
            language: options.language.clone(),
        };
        Ok(self.parser.parse(&page.content, &parse_options).await?)
    }
}
