//! AI trait for the LLM fallback.
//!
//! The parser needs exactly one capability from a language model: a
//! single chat completion returning text. Prompt construction and
//! output parsing live in the pipeline, so implementations stay thin.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ExtractionResult;

/// One completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model to use; empty means the implementation's default
    pub model: String,

    /// System prompt (the field contract)
    pub system: String,

    /// User prompt (the page content)
    pub user: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on completion length
    pub max_tokens: u32,

    /// Ask the provider to constrain output to a JSON object, if supported
    pub json_mode: bool,
}

/// AI trait for LLM operations.
///
/// Implementations wrap specific LLM providers (OpenAI, Anthropic, etc.).
/// Failures map to [`ExtractionError::AI`](crate::error::ExtractionError::AI).
#[async_trait]
pub trait AI: Send + Sync {
    /// Run one completion and return the raw text.
    async fn complete(&self, request: &CompletionRequest) -> ExtractionResult<String>;

    /// Provider/model label for logs.
    fn name(&self) -> &str {
        "ai"
    }
}

#[async_trait]
impl<T: AI + ?Sized> AI for Arc<T> {
    async fn complete(&self, request: &CompletionRequest) -> ExtractionResult<String> {
        (**self).complete(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: AI + ?Sized> AI for Box<T> {
    async fn complete(&self, request: &CompletionRequest) -> ExtractionResult<String> {
        (**self).complete(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
