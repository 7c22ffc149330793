//! OpenAI implementation of the AI trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use job_extraction::ai::OpenAI;
//! use job_extraction::security::AICredentials;
//!
//! let ai = OpenAI::new(AICredentials::new(api_key, "gpt-4o-mini"));
//! let parser = ContentParser::new(ai);
//! ```

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};
use tracing::debug;

use crate::error::{ExtractionError, ExtractionResult};
use crate::security::AICredentials;
use crate::traits::ai::{CompletionRequest, AI};

/// Chat-completions backed [`AI`].
#[derive(Debug, Clone)]
pub struct OpenAI {
    client: OpenAIClient,
    model: String,
}

impl OpenAI {
    /// Create a client from credentials.
    pub fn new(credentials: AICredentials) -> Self {
        let mut client = OpenAIClient::new(credentials.api_key);
        if let Some(base_url) = &credentials.base_url {
            client = client.with_base_url(base_url);
        }
        Self {
            client,
            model: credentials.model,
        }
    }

    /// Default model, used when a request does not name one.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl AI for OpenAI {
    async fn complete(&self, request: &CompletionRequest) -> ExtractionResult<String> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        let mut chat = ChatRequest::new(model)
            .message(Message::system(&request.system))
            .message(Message::user(&request.user))
            .temperature(request.temperature)
            .token_limit(request.max_tokens);
        if request.json_mode {
            chat = chat.json_object();
        }

        let response = self
            .client
            .chat_completion(chat)
            .await
            .map_err(|e| ExtractionError::AI(Box::new(e)))?;

        if let Some(usage) = &response.usage {
            debug!(
                model = %model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }

        Ok(response.content)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
