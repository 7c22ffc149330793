//! Model provider credentials.
//!
//! The key is held as a [`SecretString`] end to end: it is only exposed
//! by the HTTP client when the `Authorization` header is written.

use std::fmt;

pub use secrecy::SecretString;
use secrecy::ExposeSecret;

/// Key, default model and optional endpoint for the language model.
#[derive(Clone)]
pub struct AICredentials {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: Option<String>,
}

impl AICredentials {
    pub fn new(api_key: impl Into<SecretString>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    /// Point at a proxy or compatible endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// A blank key is treated as missing.
    pub fn has_key(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }
}

impl fmt::Debug for AICredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AICredentials")
            .field("api_key", &self.api_key)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_key() {
        let creds = AICredentials::new("sk-secret", "gpt-4o-mini").with_base_url("http://proxy");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
        assert!(debug.contains("gpt-4o-mini"));
        assert!(debug.contains("http://proxy"));
    }

    #[test]
    fn test_blank_key() {
        assert!(!AICredentials::new("  ", "gpt-4o-mini").has_key());
        assert!(AICredentials::new(String::from("sk-1"), "gpt-4o-mini").has_key());
    }
}
