//! OpenAI-compatible chat-completion client.
//!
//! One client covers every vendor that speaks the Chat Completions wire
//! format; connection details (base URL, model, key) come from the
//! constructor, nothing is baked into the request path. Groq and DeepSeek
//! constructors carry the vendor defaults.

use super::{ChatProvider, LlmError, DEFAULT_LLM_TIMEOUT};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const GROQ_MODEL: &str = "llama-3.3-70b-versatile";

const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";
const DEEPSEEK_MODEL: &str = "deepseek-chat";

/// Chat-completion client for any OpenAI-compatible endpoint.
pub struct ChatCompletionClient {
    client: Client,
    label: String,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Option<Duration>,
}

impl ChatCompletionClient {
    /// Create a client for an arbitrary OpenAI-compatible endpoint.
    pub fn new(label: impl Into<String>, api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            label: label.into(),
            api_key,
            base_url,
            model,
            timeout: Some(DEFAULT_LLM_TIMEOUT),
        }
    }

    /// Groq client at the fixed fast model.
    pub fn groq(api_key: String) -> Self {
        Self::new(
            "Groq (Llama 3.3 70B)",
            api_key,
            GROQ_BASE_URL.to_string(),
            GROQ_MODEL.to_string(),
        )
    }

    /// DeepSeek client; base URL and model fall back to the vendor
    /// defaults when unset.
    pub fn deepseek(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self::new(
            "DeepSeek",
            api_key,
            base_url.unwrap_or_else(|| DEEPSEEK_BASE_URL.to_string()),
            model.unwrap_or_else(|| DEEPSEEK_MODEL.to_string()),
        )
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl ChatProvider for ChatCompletionClient {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::NoApiKey(self.label.clone()));
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_message.to_string(),
                },
            ],
            max_tokens: 4096,
            temperature: 0.3,
        };

        let mut req = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                match self.timeout {
                    Some(timeout) => LlmError::Timeout(timeout),
                    None => LlmError::Network(e),
                }
            } else {
                LlmError::Network(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorResponse>(&error_text) {
                Ok(parsed) => parsed.error.message,
                Err(_) => error_text,
            };
            return Err(LlmError::from_status(status, message));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Malformed(format!("Failed to parse response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Malformed("No response choices returned".to_string()))?;

        if content.trim().is_empty() {
            return Err(LlmError::Malformed("Empty message content".to_string()));
        }

        Ok(content)
    }

    fn label(&self) -> &str {
        &self.label
    }
}
