//! Content parser: adapters first, then one LLM call.
//!
//! # Example
//!
//! ```rust,ignore
//! use job_extraction::{ContentParser, ParseOptions};
//!
//! let parser = ContentParser::new(ai);
//! let job = parser
//!     .parse(&html, &ParseOptions::for_url("https://www.seek.co.nz/job/1"))
//!     .await?;
//! ```

use tracing::{debug, info, warn};

use crate::adapters::{AdapterMatch, AdapterSet, Confidence};
use crate::error::{ExtractionError, ExtractionResult, JsonParseError};
use crate::html::{html_to_markdown, looks_like_html, truncate_chars};
use crate::json::parse_json_from_ai;
use crate::pipeline::prompts::{format_extract_prompt, EXTRACT_JOB_SYSTEM_PROMPT};
use crate::traits::ai::{CompletionRequest, AI};
use crate::types::config::{ParseOptions, ParserConfig};
use crate::types::job::{ParsedJobData, RawJobRecord};

/// Result of one extraction attempt, before validation.
enum ExtractionOutcome {
    /// A high-confidence adapter produced a viable record
    AdapterMatch(ParsedJobData),

    /// The model answered with parseable JSON
    LlmSuccess(ParsedJobData),

    /// The model answered, but no JSON could be recovered
    LlmMalformed { raw: String, error: JsonParseError },

    /// The completion call itself failed
    Failure(ExtractionError),
}

/// Converts raw page content into a validated [`ParsedJobData`].
///
/// Holds the model client for the life of the process; per-call
/// inputs come in through [`ParseOptions`].
pub struct ContentParser<A: AI> {
    ai: A,
    adapters: AdapterSet,
    config: ParserConfig,
}

impl<A: AI> ContentParser<A> {
    /// Create a parser with the default adapter chain and config.
    pub fn new(ai: A) -> Self {
        Self {
            ai,
            adapters: AdapterSet::default(),
            config: ParserConfig::default(),
        }
    }

    /// Replace the parser config.
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the adapter chain.
    pub fn with_adapters(mut self, adapters: AdapterSet) -> Self {
        self.adapters = adapters;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse `content` into a job record.
    ///
    /// Returns the first high-confidence adapter match that carries
    /// title and company without calling the model. Otherwise makes
    /// exactly one completion call. Fails with [`ExtractionError`]
    /// rather than returning a record without title or company.
    pub async fn parse(
        &self,
        content: &str,
        options: &ParseOptions,
    ) -> ExtractionResult<ParsedJobData> {
        if content.trim().is_empty() {
            return Err(ExtractionError::EmptyContent);
        }

        let source_url = options.source_url.as_deref();
        let found = self.adapters.run(content, source_url);
        debug!(
            adapter = %found.adapter,
            confidence = ?found.confidence,
            url = ?source_url,
            "adapter pass complete"
        );

        let outcome = if found.is_authoritative() {
            ExtractionOutcome::AdapterMatch(found.data.clone())
        } else {
            self.run_llm(content, options).await
        };

        self.finish(outcome, &found, content, options)
    }

    async fn run_llm(&self, content: &str, options: &ParseOptions) -> ExtractionOutcome {
        let prompt_content = if looks_like_html(content) {
            html_to_markdown(content)
        } else {
            content.trim().to_string()
        };
        if prompt_content.trim().is_empty() {
            return ExtractionOutcome::Failure(ExtractionError::EmptyContent);
        }

        let truncated = truncate_chars(&prompt_content, self.config.max_content_chars);
        if truncated.len() < prompt_content.len() {
            debug!(
                original_chars = prompt_content.chars().count(),
                kept_chars = self.config.max_content_chars,
                "truncated content for prompt"
            );
        }

        let request = CompletionRequest {
            model: self.config.model.clone(),
            system: EXTRACT_JOB_SYSTEM_PROMPT.to_string(),
            user: format_extract_prompt(
                truncated,
                options.source_url.as_deref(),
                options.language.as_deref(),
            ),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            json_mode: true,
        };

        info!(ai = self.ai.name(), url = ?options.source_url, "calling LLM for job extraction");
        let raw = match self.ai.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "LLM completion failed");
                return ExtractionOutcome::Failure(e);
            }
        };

        match parse_json_from_ai::<RawJobRecord>(&raw) {
            Ok(record) => {
                ExtractionOutcome::LlmSuccess(record.into_job(&self.config.default_currency))
            }
            Err(error) => ExtractionOutcome::LlmMalformed { raw, error },
        }
    }

    fn finish(
        &self,
        outcome: ExtractionOutcome,
        found: &AdapterMatch,
        content: &str,
        options: &ParseOptions,
    ) -> ExtractionResult<ParsedJobData> {
        let (data, path) = match outcome {
            ExtractionOutcome::AdapterMatch(data) => (data, found.adapter.as_str()),
            ExtractionOutcome::LlmSuccess(data) => {
                // Only structured matches may complete the model's answer.
                let data = if found.confidence == Confidence::High {
                    data.fill_missing_from(&found.data)
                } else {
                    data
                };
                (data, "llm")
            }
            ExtractionOutcome::LlmMalformed { raw, error } => {
                warn!(raw_len = raw.len(), error = %error, "LLM output could not be parsed as JSON");
                return Err(ExtractionError::MalformedOutput {
                    raw_preview: error.preview.clone(),
                    source: error,
                });
            }
            ExtractionOutcome::Failure(error) => return Err(error),
        };

        let mut data = data.normalized(&self.config.default_currency);
        if let Some(url) = options.source_url.as_deref() {
            data = data.with_application_url_fallback(url);
        }
        if self.config.retain_original_content {
            data.original_content = Some(content.to_string());
        }

        let missing = data.missing_required();
        if !missing.is_empty() {
            warn!(missing = ?missing, path, "extracted record is incomplete");
            return Err(ExtractionError::IncompleteRecord {
                missing,
                partial: Box::new(data),
            });
        }

        info!(path, title = ?data.title, company = ?data.company, "job extracted");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAI;
    use crate::types::job::JobType;

    const JSON_LD_PAGE: &str = r#"<html><head>
        <title>Senior Engineer - Acme Co</title>
        <script type="application/ld+json">
        {"@context": "https://schema.org", "@type": "JobPosting",
         "title": "Senior Engineer",
         "hiringOrganization": {"@type": "Organization", "name": "Acme Co"},
         "description": "Build reliable systems."}
        </script></head><body><h1>Senior Engineer</h1></body></html>"#;

    const PLAIN_PAGE: &str = r#"<html><head><title>Careers</title></head><body>
        <h1>Barista</h1><p>Flat White Ltd is hiring a barista in Wellington.</p>
        <p>$26 - $30 per hour, part time.</p></body></html>"#;

    #[tokio::test]
    async fn test_json_ld_skips_llm() {
        let ai = MockAI::new();
        let parser = ContentParser::new(ai.clone());

        let job = parser
            .parse(JSON_LD_PAGE, &ParseOptions::default())
            .await
            .unwrap();

        assert_eq!(job.title.as_deref(), Some("Senior Engineer"));
        assert_eq!(job.company.as_deref(), Some("Acme Co"));
        assert_eq!(job.description.as_deref(), Some("Build reliable systems."));
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_llm_called_once_without_structured_data() {
        let ai = MockAI::new().with_response(
            r#"```json
{"title": "Barista", "company": "Flat White Ltd", "location": "Wellington",
 "job_type": "part time", "salary_min": 26, "salary_max": 30}
```"#,
        );
        let parser = ContentParser::new(ai.clone());
        let options = ParseOptions::for_url("https://flatwhite.example/jobs/barista");

        let job = parser.parse(PLAIN_PAGE, &options).await.unwrap();

        assert_eq!(ai.call_count(), 1);
        assert_eq!(job.company.as_deref(), Some("Flat White Ltd"));
        assert_eq!(job.job_type, Some(JobType::PartTime));
        assert_eq!(job.salary_currency.as_deref(), Some("NZD"));
        assert_eq!(
            job.application_url.as_deref(),
            Some("https://flatwhite.example/jobs/barista")
        );
        assert_eq!(job.original_content.as_deref(), Some(PLAIN_PAGE));

        let request = &ai.calls()[0];
        assert!(request.json_mode);
        assert!(request.temperature <= 0.2);
        assert!(request.user.contains("# Barista"));
        assert!(!request.user.contains("<p>"));
    }

    #[tokio::test]
    async fn test_missing_company_is_an_error() {
        let ai = MockAI::new().with_response(r#"{"title": "Barista", "company": null}"#);
        let parser = ContentParser::new(ai);

        let err = parser
            .parse(PLAIN_PAGE, &ParseOptions::default())
            .await
            .unwrap_err();

        match err {
            ExtractionError::IncompleteRecord { missing, partial } => {
                assert_eq!(missing, vec!["company"]);
                assert_eq!(partial.title.as_deref(), Some("Barista"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_page_title_never_fills_llm_gaps() {
        // The fallback carries company "Unknown"; it must not rescue the record.
        let ai = MockAI::new().with_response(r#"{"title": "Barista"}"#);
        let parser = ContentParser::new(ai);

        let err = parser
            .parse(PLAIN_PAGE, &ParseOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::IncompleteRecord { .. }));
    }

    #[tokio::test]
    async fn test_incomplete_structured_match_fills_llm_gaps() {
        let page = r#"<html><head><script type="application/ld+json">
            {"@type": "JobPosting", "hiringOrganization": {"name": "Acme Co"},
             "datePosted": "2024-06-01"}
            </script></head><body><h1>Platform Engineer</h1></body></html>"#;
        let ai = MockAI::new().with_response(r#"{"title": "Platform Engineer", "company": null}"#);
        let parser = ContentParser::new(ai.clone());

        let job = parser.parse(page, &ParseOptions::default()).await.unwrap();

        assert_eq!(ai.call_count(), 1);
        assert_eq!(job.title.as_deref(), Some("Platform Engineer"));
        assert_eq!(job.company.as_deref(), Some("Acme Co"));
        assert!(job.posted_date.is_some());
    }

    #[tokio::test]
    async fn test_malformed_output() {
        let ai = MockAI::new().with_response("Sorry, I cannot help with that request.");
        let parser = ContentParser::new(ai);

        let err = parser
            .parse("Chef wanted at Cafe Uno", &ParseOptions::default())
            .await
            .unwrap_err();

        match err {
            ExtractionError::MalformedOutput { raw_preview, source } => {
                assert!(raw_preview.starts_with("Sorry"));
                assert!(!source.message.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ai_failure_propagates() {
        let ai = MockAI::new().with_failure("quota exceeded");
        let parser = ContentParser::new(ai);

        let err = parser
            .parse("Chef wanted at Cafe Uno", &ParseOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::AI(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_empty_content() {
        let ai = MockAI::new();
        let parser = ContentParser::new(ai.clone());

        let err = parser.parse("  \n ", &ParseOptions::default()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyContent));
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_content_is_truncated() {
        let ai = MockAI::new().with_response(r#"{"title": "Cook", "company": "Diner"}"#);
        let config = ParserConfig::new()
            .with_max_content_chars(100)
            .with_retain_original_content(false);
        let parser = ContentParser::new(ai.clone()).with_config(config);
        let content = "word ".repeat(5_000);

        let job = parser.parse(&content, &ParseOptions::default()).await.unwrap();

        assert_eq!(job.original_content, None);
        assert!(ai.calls()[0].user.len() < 400);
    }

    #[tokio::test]
    async fn test_language_reaches_prompt() {
        let ai = MockAI::new().with_response(r#"{"title": "Cook", "company": "Diner"}"#);
        let parser = ContentParser::new(ai.clone());

        parser
            .parse("Cook wanted", &ParseOptions::default().with_language("zh"))
            .await
            .unwrap();

        assert!(ai.calls()[0].user.contains("Simplified Chinese"));
    }
}
