//! Speech-to-Text (STT) provider abstraction and implementations.
//!
//! The correction pipeline consumes plain transcript text; transcription
//! is the step that produces it from captured audio. One provider is
//! configured at a time, through an explicit settings object.

mod groq;

pub use groq::GroqTranscriber;

use async_trait::async_trait;

/// Audio format information for STT processing
#[derive(Debug, Clone)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u8,
    pub encoding: AudioEncoding,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            encoding: AudioEncoding::Wav,
        }
    }
}

/// Supported audio encoding formats
#[derive(Debug, Clone, Copy)]
pub enum AudioEncoding {
    Wav,
    Pcm16,
}

/// Errors that can occur during STT operations
#[derive(Debug, thiserror::Error)]
pub enum SttError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Audio processing error: {0}")]
    Audio(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout: transcription took too long")]
    Timeout,
}

impl SttError {
    /// Classify a non-2xx HTTP response.
    pub(crate) fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 | 403 => SttError::Unauthorized(message),
            429 => SttError::RateLimited(message),
            s => SttError::Api { status: s, message },
        }
    }
}

/// Trait for Speech-to-Text providers
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe audio data to text
    ///
    /// # Arguments
    /// * `audio` - Raw audio bytes (typically WAV format)
    /// * `format` - Information about the audio format
    ///
    /// # Returns
    /// The transcribed text, or an error if transcription fails
    async fn transcribe(&self, audio: &[u8], format: &AudioFormat) -> Result<String, SttError>;

    /// Get the name of this provider
    fn name(&self) -> &'static str;
}
