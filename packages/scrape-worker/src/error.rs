//! Worker errors and their HTTP mapping.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use job_extraction::{
    ExtractionError, SecurityError, SCRAPE_STAGE_HEADER, STAGE_PARSE, STAGE_RENDER,
};
use thiserror::Error;

/// Scraping a page failed after the request was accepted.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Browser process could not be started
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Page could not be opened or navigated
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Navigation did not settle in time
    #[error("navigation timeout after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Rendered HTML could not be read
    #[error("could not read page content: {0}")]
    Content(String),

    /// Rendered page did not yield a job record
    #[error(transparent)]
    Parse(#[from] ExtractionError),
}

impl WorkerError {
    /// Which step failed, as sent in the stage response header.
    pub fn stage(&self) -> &'static str {
        match self {
            WorkerError::Parse(_) => STAGE_PARSE,
            _ => STAGE_RENDER,
        }
    }
}

/// Everything a scrape request can answer with besides a record.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing url parameter")]
    MissingUrl,

    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] SecurityError),

    #[error("Scraping failed: {0}")]
    Scrape(#[from] WorkerError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            ApiError::Scrape(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.to_string();
        match &self {
            ApiError::Scrape(e) => {
                (status, [(SCRAPE_STAGE_HEADER, e.stage())], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

impl IntoResponse for WorkerError {
    fn into_response(self) -> Response {
        ApiError::Scrape(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::MissingUrl.to_string(), "Missing url parameter");

        let err = ApiError::from(WorkerError::Timeout(Duration::from_secs(30)));
        assert_eq!(err.to_string(), "Scraping failed: navigation timeout after 30s");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::from(WorkerError::Parse(ExtractionError::EmptyContent));
        assert_eq!(err.to_string(), "Scraping failed: content is empty");
    }

    #[test]
    fn test_stage_header() {
        let response = WorkerError::Parse(ExtractionError::EmptyContent).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[SCRAPE_STAGE_HEADER], STAGE_PARSE);

        let response = WorkerError::Navigation("net::ERR_NAME_NOT_RESOLVED".into()).into_response();
        assert_eq!(response.headers()[SCRAPE_STAGE_HEADER], STAGE_RENDER);

        let response = ApiError::MissingUrl.into_response();
        assert!(response.headers().get(SCRAPE_STAGE_HEADER).is_none());
    }
}
