//! Page retrieval implementations.
//!
//! - [`HttpFetcher`]: direct reqwest GET with a browser-like user agent
//! - [`RemoteScraperClient`]: delegates to a headless-browser scrape worker

mod http;
mod remote;

pub use http::{HttpFetcher, DEFAULT_USER_AGENT};
pub use remote::RemoteScraperClient;
