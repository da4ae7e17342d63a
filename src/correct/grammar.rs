//! Grammar correction stage.
//!
//! Single provider, no fallback. Off by default in the pipeline
//! configuration; a failure here leaves the working text unchanged and
//! must never stop the punctuation stage from running.

use super::{prompts, StageResult};
use crate::config::Mode;
use crate::llm::GenerativeProvider;

/// Correct grammatical errors (case, tense, agreement) via the generative
/// provider, preserving spelling and punctuation.
pub async fn correct_grammar(
    generative: Option<&dyn GenerativeProvider>,
    text: &str,
    mode: Mode,
) -> StageResult {
    if text.trim().is_empty() {
        return StageResult::passthrough(text);
    }

    let Some(generative) = generative else {
        return StageResult::failure(text, "generative provider not configured");
    };

    log::debug!(
        "Grammar: correcting {} chars ({:?} mode) via {}",
        text.chars().count(),
        mode,
        generative.label()
    );

    match generative.generate(&prompts::grammar_prompt(text)).await {
        Ok(corrected) if !corrected.trim().is_empty() => {
            StageResult::success(corrected.trim().to_string(), generative.label())
        }
        Ok(_) => StageResult::failure(text, "grammar provider returned empty text"),
        Err(e) => {
            log::warn!("Grammar: {} failed ({})", generative.label(), e);
            StageResult::failure(text, e.to_string())
        }
    }
}
