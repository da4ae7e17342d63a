//! Voice-dictation transcript correction.
//!
//! This crate takes a raw speech-to-text transcript and runs it through a
//! chain of correction stages (spelling, grammar, punctuation/style)
//! backed by interchangeable cloud providers with automatic fallback. The
//! punctuation stage walks a fixed three-tier provider chain (Gemini →
//! Groq → DeepSeek) so an outage or quota exhaustion at one vendor still
//! produces a corrected result; when every provider is down the caller
//! gets the original text back with a per-stage failure report.
//!
//! The crate also ships the surrounding plumbing a dictation app needs:
//! an audio-transcription adapter, provider settings resolution, and a
//! local recording store with transcripts and metadata.

mod config;
mod correct;
mod llm;
mod pipeline;
mod speller;
mod store;
mod stt;

#[cfg(test)]
mod tests;

pub use config::{
    default_data_dir, DeepSeekSettings, Mode, PipelineConfig, ProviderSettings, Tone,
    TranscriptionSettings, DEFAULT_LANGUAGES,
};
pub use correct::{PunctuationTiers, StageResult};
pub use llm::{
    ChatCompletionClient, ChatProvider, GeminiClient, GenerativeProvider, LlmError,
    DEFAULT_LLM_TIMEOUT,
};
pub use pipeline::{CorrectionPipeline, PipelineResult, StageOutcomes};
pub use speller::{SpellChecker, SpellCorrection, SpellerError, YandexSpeller};
pub use store::{RecordingEntry, RecordingMeta, RecordingStore, RecordingUpdate};
pub use stt::{AudioEncoding, AudioFormat, GroqTranscriber, SttError, TranscriptionProvider};
