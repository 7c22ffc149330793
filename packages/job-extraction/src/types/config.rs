//! Configuration types for parsing and URL resolution.

use serde::{Deserialize, Serialize};

use super::job::DEFAULT_CURRENCY;

/// Configuration for the content parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Chat model used for the LLM fallback.
    ///
    /// Default: `gpt-4o-mini`.
    pub model: String,

    /// Sampling temperature for the completion call.
    ///
    /// Kept low so repeated parses of the same page agree. Default: 0.1.
    pub temperature: f32,

    /// Upper bound on completion length.
    ///
    /// Default: 2000.
    pub max_tokens: u32,

    /// Characters of page content embedded in the prompt.
    ///
    /// Content is converted to markdown first, then cut on a char
    /// boundary. Default: 12 000.
    pub max_content_chars: usize,

    /// Currency assumed when a salary has none. Default: `NZD`.
    pub default_currency: String,

    /// Keep the raw input on the record as `original_content`.
    ///
    /// Default: true.
    pub retain_original_content: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            max_tokens: 2_000,
            max_content_chars: 12_000,
            default_currency: DEFAULT_CURRENCY.to_string(),
            retain_original_content: true,
        }
    }
}

impl ParserConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set the prompt content budget.
    pub fn with_max_content_chars(mut self, chars: usize) -> Self {
        self.max_content_chars = chars;
        self
    }

    /// Set the default currency.
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    /// Keep or drop the raw input on produced records.
    pub fn with_retain_original_content(mut self, retain: bool) -> Self {
        self.retain_original_content = retain;
        self
    }
}

/// Per-call options for [`ContentParser::parse`](crate::pipeline::ContentParser::parse).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Where the content came from, if known.
    ///
    /// Used for adapter host matching and as the default `application_url`.
    pub source_url: Option<String>,

    /// Language for description, requirements and benefits.
    ///
    /// `None` keeps the posting's own language.
    pub language: Option<String>,
}

impl ParseOptions {
    /// Options for content fetched from `url`.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            source_url: Some(url.into()),
            language: None,
        }
    }

    /// Set the output language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Per-call options for [`UrlResolver::resolve`](crate::pipeline::UrlResolver::resolve).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Remote headless-browser worker endpoint.
    ///
    /// When set, the target URL is never fetched locally unless
    /// `allow_local_fallback` is also set.
    pub scraper_url: Option<String>,

    /// Language hint forwarded to the parser or the worker.
    pub language: Option<String>,

    /// Retry with a direct fetch when the worker fails.
    ///
    /// Off by default: pages routed to the worker usually block direct
    /// fetches, so a local "success" tends to be a challenge page.
    #[serde(default)]
    pub allow_local_fallback: bool,
}

impl ResolveOptions {
    /// Create options with no remote worker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delegate fetching to the worker at `url`.
    pub fn with_scraper_url(mut self, url: impl Into<String>) -> Self {
        self.scraper_url = Some(url.into());
        self
    }

    /// Set the language hint.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Opt in to a direct fetch after a worker failure.
    pub fn with_local_fallback(mut self, allow: bool) -> Self {
        self.allow_local_fallback = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_config_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(config.temperature <= 0.2);
        assert_eq!(config.default_currency, "NZD");
        assert!(config.retain_original_content);
    }

    #[test]
    fn test_parser_config_partial_deserialize() {
        let config: ParserConfig =
            serde_json::from_str(r#"{"model": "gpt-4o", "max_content_chars": 500}"#).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_content_chars, 500);
        assert_eq!(config.default_currency, "NZD");
    }

    #[test]
    fn test_temperature_is_clamped() {
        let config = ParserConfig::new().with_temperature(5.0);
        assert_eq!(config.temperature, 2.0);
    }

    #[test]
    fn test_resolve_options_builder() {
        let options = ResolveOptions::new()
            .with_scraper_url("https://worker.example")
            .with_language("en");
        assert_eq!(options.scraper_url.as_deref(), Some("https://worker.example"));
        assert_eq!(options.language.as_deref(), Some("en"));
        assert!(!options.allow_local_fallback);
    }
}
