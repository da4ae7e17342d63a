//! Transcript correction stages.
//!
//! Each stage is an independently invokable async step with its own
//! success/failure outcome. Stages report failure in the returned
//! [`StageResult`] instead of propagating errors, so a broken provider
//! can never stop the stages that follow.

mod grammar;
mod prompts;
mod punctuation;
mod spelling;

pub use grammar::correct_grammar;
pub use punctuation::{correct_punctuation, PunctuationTiers};
pub use spelling::correct_spelling;

/// Outcome of a single correction stage.
///
/// Created fresh per stage invocation and never mutated after return.
#[derive(Debug, Clone)]
pub struct StageResult {
    pub succeeded: bool,
    /// The stage's output on success; the stage's input text on failure.
    pub text: String,
    pub error_message: Option<String>,
    /// Label of the provider that produced the text (e.g.
    /// "Yandex.Speller", "Groq (Llama 3.3 70B)"). `None` when the stage
    /// never reached a provider.
    pub provider: Option<String>,
}

impl StageResult {
    pub(crate) fn success(text: String, provider: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            text,
            error_message: None,
            provider: Some(provider.into()),
        }
    }

    /// Successful stage that never reached a provider (empty input).
    pub(crate) fn passthrough(text: &str) -> Self {
        Self {
            succeeded: true,
            text: text.to_string(),
            error_message: None,
            provider: None,
        }
    }

    pub(crate) fn failure(input_text: &str, error_message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            text: input_text.to_string(),
            error_message: Some(error_message.into()),
            provider: None,
        }
    }
}
