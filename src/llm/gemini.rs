//! Google Gemini (AI Studio / Gemini Developer API) generative-text client.
//!
//! Gemini does not speak the Chat Completions format; requests go to
//! `models.generateContent` as a single user turn.

use super::{GenerativeProvider, LlmError, DEFAULT_LLM_TIMEOUT};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini client using the `models.generateContent` REST API.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    timeout: Option<Duration>,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            timeout: Some(DEFAULT_LLM_TIMEOUT),
        }
    }

    pub fn with_model(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            timeout: Some(DEFAULT_LLM_TIMEOUT),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn normalize_model_name(model: &str) -> String {
        let trimmed = model.trim();
        if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{}", trimmed)
        }
    }

    fn extract_text(response: &GenerateContentResponse) -> Result<String, LlmError> {
        let candidate = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or_else(|| {
                LlmError::Malformed("Gemini API returned no candidates".to_string())
            })?;

        let parts = candidate
            .content
            .as_ref()
            .map(|c| c.parts.as_slice())
            .ok_or_else(|| {
                LlmError::Malformed(
                    "Gemini API returned a candidate without content.parts".to_string(),
                )
            })?;

        let mut combined = String::new();
        for p in parts {
            if let Some(text) = p.text.as_ref() {
                combined.push_str(text);
            }
        }

        if combined.trim().is_empty() {
            return Err(LlmError::Malformed(
                "Gemini API returned empty candidate text".to_string(),
            ));
        }

        Ok(combined)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::NoApiKey("Gemini".to_string()));
        }

        let model = Self::normalize_model_name(&self.model);
        let url = format!("{}/{model}:generateContent", GEMINI_API_ROOT);

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            // Deterministic correction output.
            generation_config: GenerationConfig {
                max_output_tokens: 4096,
                temperature: 0.0,
            },
        };

        let mut req = self
            .client
            .post(url)
            .header("x-goog-api-key", self.api_key.trim())
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
            let message = match serde_json::from_str::<GeminiErrorResponse>(&error_text) {
                Ok(parsed) => parsed.error.message,
                Err(_) => error_text,
            };
            return Err(LlmError::from_status(status, message));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::Malformed(format!("Failed to parse Gemini response: {}", e))
        })?;

        Self::extract_text(&parsed)
    }

    fn label(&self) -> &str {
        "Gemini"
    }
}
