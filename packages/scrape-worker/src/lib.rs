//! Headless-browser scrape worker.
//!
//! Renders job pages that block plain HTTP fetches or need JavaScript,
//! then runs the same [`ContentParser`] the library uses and answers
//! with the finished [`ParsedJobData`](job_extraction::ParsedJobData).
//!
//! ```text
//! GET /?url=<encoded-url>&language=<code>   200 JSON | 400 | 500 "Scraping failed: ..."
//! GET /health                               200 "OK"
//! ```
//!
//! A 500 carries `x-scrape-stage: render` when the page could not be
//! reached or rendered and `x-scrape-stage: parse` when it rendered but
//! held no usable job.

pub mod browser;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::extract::Extension;
use axum::routing::get;
use axum::Router;
use job_extraction::{ContentParser, UrlValidator, AI};
use tower_http::trace::TraceLayer;

pub use browser::{ChromiumRenderer, PageRenderer, RendererConfig};
pub use config::Config;
pub use error::{ApiError, WorkerError};

/// Shared worker state
#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<ContentParser<Arc<dyn AI>>>,
    pub renderer: Arc<dyn PageRenderer>,
    pub validator: UrlValidator,
    pub default_language: String,
}

impl AppState {
    pub fn new(
        parser: ContentParser<Arc<dyn AI>>,
        renderer: Arc<dyn PageRenderer>,
        default_language: impl Into<String>,
    ) -> Self {
        Self {
            parser: Arc::new(parser),
            renderer,
            validator: UrlValidator::new(),
            default_language: default_language.into(),
        }
    }

    /// Replace the target URL validator.
    pub fn with_validator(mut self, validator: UrlValidator) -> Self {
        self.validator = validator;
        self
    }
}

/// Build the worker router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::scrape_handler))
        .route("/health", get(routes::health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
