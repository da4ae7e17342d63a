//! Spelling-check provider abstraction and implementations.

mod yandex;

pub use yandex::YandexSpeller;

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Errors that can occur during spell-check operations
#[derive(Debug, thiserror::Error)]
pub enum SpellerError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Malformed(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// One correction record as reported by the spelling service.
///
/// `pos` and `len` are character offsets into the submitted text;
/// `candidates` is ordered best-first and may be empty.
#[derive(Debug, Clone, Deserialize)]
pub struct SpellCorrection {
    pub code: u32,
    pub pos: usize,
    pub row: usize,
    pub col: usize,
    pub len: usize,
    pub word: String,
    #[serde(rename = "s")]
    pub candidates: Vec<String>,
}

/// Trait for spelling-check providers
#[async_trait]
pub trait SpellChecker: Send + Sync {
    /// Check `text` against the given language codes and return the
    /// correction records in document order.
    async fn check(
        &self,
        text: &str,
        languages: &[String],
    ) -> Result<Vec<SpellCorrection>, SpellerError>;

    /// Label identifying this provider in stage results.
    fn label(&self) -> &str;
}
