//! Answering chat queries with an LLM.
//!
//! The query server hands each `{ "query" }` to an [`Assistant`]. The
//! production implementation is [`ChatCompletionsAssistant`], which renders
//! the answer prompt and calls an OpenAI-compatible `/v1/chat/completions`
//! endpoint.

pub mod chat_completions;
pub mod prompt;
pub mod provider;

pub use chat_completions::ChatCompletionsAssistant;
pub use provider::Provider;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// LLM connection and model settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Base URL for the LLM API (e.g., `https://api.openai.com`).
    pub base_url: String,
    /// Optional API key for authentication.
    pub api_key: Option<String>,
    /// Model identifier (e.g., `gpt-3.5-turbo-16k`).
    pub model: String,
    /// Provider type (auto-detected from `base_url`).
    pub provider: Provider,
    /// Sampling temperature.
    pub temperature: f32,
    /// Who the model should send users to when it cannot answer.
    pub support_contact: String,
}

/// Failure to produce an answer.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// The LLM request could not be sent or read.
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The LLM API answered with a non-success status.
    #[error("LLM API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error body returned by the API.
        message: String,
    },

    /// The completion carried no text.
    #[error("LLM returned an empty completion")]
    EmptyCompletion,
}

/// Answers a single user query.
#[async_trait::async_trait]
pub trait Assistant: Send + Sync {
    /// Produce the answer text for `query`.
    async fn answer(&self, query: &str) -> Result<String, AssistantError>;
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User message.
    User,
}

/// A message in a chat completions request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author.
    pub role: MessageRole,
    /// Text content.
    pub content: String,
}

impl ChatMessage {
    /// A user-authored message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}
