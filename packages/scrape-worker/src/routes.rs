use axum::extract::{Extension, Query};
use axum::Json;
use job_extraction::{ParseOptions, ParsedJobData, SecurityError};
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, WorkerError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ScrapeParams {
    pub url: Option<String>,
    pub language: Option<String>,
}

/// `GET /?url=...&language=...`
///
/// Renders the page in a fresh headless browser and parses the result.
pub async fn scrape_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ScrapeParams>,
) -> Result<Json<ParsedJobData>, ApiError> {
    let url = params
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::MissingUrl)?;

    // An unresolvable host is a navigation failure, not a bad request.
    state
        .validator
        .validate_with_dns(&url)
        .await
        .map_err(|e| match e {
            SecurityError::DnsResolution(msg) => {
                ApiError::Scrape(WorkerError::Navigation(format!("could not resolve host: {msg}")))
            }
            other => ApiError::InvalidUrl(other),
        })?;

    let language = params
        .language
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| state.default_language.clone());

    info!(url = %url, language = %language, "scrape requested");

    let html = state.renderer.render(&url).await?;
    let options = ParseOptions::for_url(url.as_str()).with_language(language);
    let job = state
        .parser
        .parse(&html, &options)
        .await
        .map_err(WorkerError::Parse)?;

    info!(
        url = %url,
        title = job.title.as_deref().unwrap_or_default(),
        company = job.company.as_deref().unwrap_or_default(),
        "scrape finished"
    );
    Ok(Json(job))
}

/// `GET /health`
pub async fn health_handler() -> &'static str {
    "OK"
}
