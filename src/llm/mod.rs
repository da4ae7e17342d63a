//! LLM provider adapters for transcript correction.
//!
//! Two wire shapes are supported: the OpenAI-compatible Chat Completions
//! API (Groq, DeepSeek) and Google's `generateContent` API (Gemini). Both
//! are exposed through narrow async traits so the correction stages can be
//! exercised against mocks.

mod chat;
mod gemini;

pub use chat::ChatCompletionClient;
pub use gemini::GeminiClient;

use async_trait::async_trait;
use std::time::Duration;

/// Default timeout for LLM API requests
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur during LLM operations.
///
/// Transport failures are classified into a closed set of kinds here in
/// the adapter layer; callers switch on the variant and never inspect
/// error message text.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Malformed(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("No API key configured for provider: {0}")]
    NoApiKey(String),
}

impl LlmError {
    /// Classify a non-2xx HTTP response.
    pub(crate) fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 | 403 => LlmError::Unauthorized(message),
            429 => LlmError::RateLimited(message),
            s if s >= 500 => LlmError::Server { status: s, message },
            s => LlmError::Api { status: s, message },
        }
    }

    /// True for quota/rate-limit failures. The punctuation stage logs this
    /// distinctly when a tier falls through, so quota exhaustion and
    /// outages are tellable apart in the logs.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LlmError::RateLimited(_))
    }
}

/// Trait for chat-completion providers (system + user message pair).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Complete a system+user message pair and return the assistant text.
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError>;

    /// Label identifying this provider in stage results.
    fn label(&self) -> &str;
}

/// Trait for single-turn generative-text providers.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Generate text from a single-turn prompt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Label identifying this provider in stage results.
    fn label(&self) -> &str;
}
