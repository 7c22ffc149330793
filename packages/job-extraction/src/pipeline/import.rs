//! Batch import: fan out URL and content items, collect per-item outcomes.

use futures::future::join_all;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::pipeline::resolve::UrlResolver;
use crate::traits::ai::AI;
use crate::traits::fetcher::PageFetcher;
use crate::traits::remote::RemoteScraper;
use crate::traits::store::JobStore;
use crate::types::config::{ParseOptions, ResolveOptions};
use crate::types::import::{ImportItem, ImportItemResult, ImportRequest, ImportResponse};

/// Runs every item of an [`ImportRequest`] concurrently.
///
/// One item failing never affects the others; each failure becomes a
/// `success: false` entry with the error message, in input order.
pub struct JobImporter<A: AI, F: PageFetcher, R: RemoteScraper, S: JobStore> {
    resolver: UrlResolver<A, F, R>,
    store: S,
}

impl<A: AI, F: PageFetcher, R: RemoteScraper, S: JobStore> JobImporter<A, F, R, S> {
    pub fn new(resolver: UrlResolver<A, F, R>, store: S) -> Self {
        Self { resolver, store }
    }

    pub fn resolver(&self) -> &UrlResolver<A, F, R> {
        &self.resolver
    }

    /// Import every item for `user_id`.
    ///
    /// Only a request with no items at all is an error.
    pub async fn import(&self, user_id: &str, request: ImportRequest) -> Result<ImportResponse> {
        let ImportRequest {
            source,
            save_immediately,
            language,
            scraper_url,
        } = request;

        let items = source.into_items();
        if items.is_empty() {
            return Err(Error::EmptyBatch);
        }

        let resolve_options = ResolveOptions {
            scraper_url,
            language,
            allow_local_fallback: false,
        };

        info!(
            user_id = %user_id,
            items = items.len(),
            save_immediately,
            "starting job import"
        );

        let results = join_all(
            items
                .iter()
                .map(|item| self.import_item(user_id, item, save_immediately, &resolve_options)),
        )
        .await;

        let response = ImportResponse::from_results(results);
        info!(
            user_id = %user_id,
            succeeded = response.results.len() - response.failure_count(),
            failed = response.failure_count(),
            "job import finished"
        );
        Ok(response)
    }

    async fn import_item(
        &self,
        user_id: &str,
        item: &ImportItem,
        save_immediately: bool,
        options: &ResolveOptions,
    ) -> ImportItemResult {
        let input = item.describe();

        let parsed = match item {
            ImportItem::Url(url) => self.resolver.resolve(url, options).await,
            ImportItem::Content(content) => {
                let parse_options = ParseOptions {
                    source_url: None,
                    language: options.language.clone(),
                };
                self.resolver
                    .parser()
                    .parse(content, &parse_options)
                    .await
                    .map_err(Error::from)
            }
        };

        let data = match parsed {
            Ok(data) => data,
            Err(e) => {
                warn!(input = %input, error = %e, "import item failed");
                return ImportItemResult::failed(input, e.to_string());
            }
        };

        if !save_immediately {
            return ImportItemResult::succeeded(input, data, None);
        }

        match self.store.save_job(user_id, &data).await {
            Ok(job_id) => ImportItemResult::succeeded(input, data, Some(job_id)),
            Err(e) => {
                warn!(input = %input, error = %e, "saving imported job failed");
                ImportItemResult::failed(input, e.to_string())
            }
        }
    }
}
