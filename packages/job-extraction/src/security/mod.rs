//! Security: SSRF protection and credential handling.

pub mod credentials;
pub mod url_validator;

pub use credentials::{AICredentials, SecretString};
pub use url_validator::UrlValidator;
