//! Pipeline run configuration and provider credentials.
//!
//! Two kinds of configuration live here:
//!
//! - [`PipelineConfig`] describes one correction run (which stages to run,
//!   correction mode, tone, languages). It is immutable for the duration of
//!   a run.
//! - [`ProviderSettings`] holds the credentials and endpoint overrides for
//!   every provider adapter. It is resolved once (environment variables
//!   first, then an optional JSON overrides file on top) and handed to the
//!   pipeline constructor; runtime reconfiguration replaces the whole
//!   settings object atomically.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Languages assumed when a run configuration does not specify any.
pub const DEFAULT_LANGUAGES: [&str; 2] = ["ru", "en"];

/// Correction mode for a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Punctuation-only cleanup; no style changes.
    General,
    /// Correction with light rewording permitted.
    Corrector,
    /// Transcript is expected to contain code-adjacent speech.
    Coder,
    /// Transcript will be translated downstream.
    Translator,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::General
    }
}

/// Tone directive applied in non-general modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Default,
    Friendly,
    Serious,
    Professional,
}

impl Default for Tone {
    fn default() -> Self {
        Tone::Default
    }
}

/// Configuration for one correction pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub mode: Mode,
    pub tone: Tone,
    /// Run the spelling stage.
    pub enable_spelling: bool,
    /// Run the grammar stage. Off by default: the stage has no fallback
    /// protection and punctuation already covers most dictation cleanup.
    pub enable_grammar: bool,
    /// Run the punctuation/style stage.
    pub enable_punctuation: bool,
    /// Language codes, in priority order, passed to the spelling service
    /// and named in punctuation instructions.
    pub languages: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            tone: Tone::default(),
            enable_spelling: true,
            enable_grammar: false,
            enable_punctuation: true,
            languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// DeepSeek (alternate chat-completion vendor) settings.
///
/// All fields optional; the adapter falls back to the vendor defaults for
/// base URL and model, and to the primary chat key when no dedicated key is
/// configured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeepSeekSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// Audio transcription endpoint settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    /// Dedicated transcription key. When unset, the Groq key is reused
    /// (the default transcription endpoint is Groq Whisper).
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// Credentials and endpoint configuration for every provider adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Gemini API key. When unset, the generative adapter is not
    /// constructed: punctuation tier 1 and the spelling fallback are
    /// skipped.
    pub gemini_api_key: Option<String>,
    /// Groq API key for the fast chat-completion tier (and, by default,
    /// transcription).
    pub groq_api_key: String,
    pub deepseek: DeepSeekSettings,
    pub transcription: TranscriptionSettings,
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn nonempty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Optional key-by-key overrides persisted by the settings UI.
///
/// Overrides win over environment values.
#[derive(Debug, Default, Deserialize)]
struct SettingsOverrides {
    gemini_api_key: Option<String>,
    groq_api_key: Option<String>,
    deepseek_api_key: Option<String>,
    deepseek_base_url: Option<String>,
    deepseek_model: Option<String>,
    transcription_api_key: Option<String>,
    transcription_base_url: Option<String>,
    transcription_model: Option<String>,
}

impl ProviderSettings {
    /// Resolve settings from environment variables only.
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: env_nonempty("GEMINI_API_KEY"),
            groq_api_key: env_nonempty("GROQ_API_KEY").unwrap_or_default(),
            deepseek: DeepSeekSettings {
                api_key: env_nonempty("DEEPSEEK_API_KEY"),
                base_url: env_nonempty("DEEPSEEK_BASE_URL"),
                model: env_nonempty("DEEPSEEK_MODEL"),
            },
            transcription: TranscriptionSettings {
                api_key: env_nonempty("TRANSCRIPTION_API_KEY"),
                base_url: env_nonempty("TRANSCRIPTION_BASE_URL"),
                model: env_nonempty("TRANSCRIPTION_MODEL"),
            },
        }
    }

    /// Resolve settings from the environment, then layer the overrides file
    /// (`settings.json` under `data_dir`) on top.
    pub fn load(data_dir: &Path) -> Self {
        let mut settings = Self::from_env();
        let overrides_path = data_dir.join("settings.json");
        match Self::read_overrides(&overrides_path) {
            Some(overrides) => settings.apply_overrides(overrides),
            None => log::debug!(
                "Settings: no overrides file at {}, using environment only",
                overrides_path.display()
            ),
        }
        settings
    }

    fn read_overrides(path: &Path) -> Option<SettingsOverrides> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(overrides) => Some(overrides),
            Err(e) => {
                log::warn!("Settings: ignoring malformed overrides file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn apply_overrides(&mut self, o: SettingsOverrides) {
        if let Some(v) = o.gemini_api_key.as_deref().and_then(nonempty) {
            self.gemini_api_key = Some(v);
        }
        if let Some(v) = o.groq_api_key.as_deref().and_then(nonempty) {
            self.groq_api_key = v;
        }
        if let Some(v) = o.deepseek_api_key.as_deref().and_then(nonempty) {
            self.deepseek.api_key = Some(v);
        }
        if let Some(v) = o.deepseek_base_url.as_deref().and_then(nonempty) {
            self.deepseek.base_url = Some(v);
        }
        if let Some(v) = o.deepseek_model.as_deref().and_then(nonempty) {
            self.deepseek.model = Some(v);
        }
        if let Some(v) = o.transcription_api_key.as_deref().and_then(nonempty) {
            self.transcription.api_key = Some(v);
        }
        if let Some(v) = o.transcription_base_url.as_deref().and_then(nonempty) {
            self.transcription.base_url = Some(v);
        }
        if let Some(v) = o.transcription_model.as_deref().and_then(nonempty) {
            self.transcription.model = Some(v);
        }
    }

    /// Key for the alternate chat-completion tier: the dedicated DeepSeek
    /// key when set, otherwise the primary chat key.
    pub fn resolved_deepseek_key(&self) -> Option<String> {
        self.deepseek
            .api_key
            .as_deref()
            .and_then(nonempty)
            .or_else(|| nonempty(&self.groq_api_key))
    }

    /// Key for the transcription endpoint: dedicated key when set,
    /// otherwise the Groq key.
    pub fn resolved_transcription_key(&self) -> Option<String> {
        self.transcription
            .api_key
            .as_deref()
            .and_then(nonempty)
            .or_else(|| nonempty(&self.groq_api_key))
    }
}

/// Default application data directory.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dictamen")
}
