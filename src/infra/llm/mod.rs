//! Groq chat-completions client.
//!
//! Thin wrapper over the OpenAI-compatible endpoint. Callers treat every
//! failure here as a soft signal; nothing in this module reaches the
//! HTTP response path.

mod groq;

pub use groq::GroqClient;

use async_trait::async_trait;
use thiserror::Error;

/// One chat-completion exchange: a system instruction plus the user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Errors from the completion provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key configured; callers fall back immediately
    #[error("no API key configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("provider returned no completion text")]
    EmptyCompletion,
}

/// Text-completion provider abstraction.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one completion and return the raw reply text.
    async fn complete(&self, prompt: ChatPrompt) -> Result<String, LlmError>;
}
