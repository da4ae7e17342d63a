//! Spelling correction stage.
//!
//! Primary path is the spell-check service; when it is unreachable the
//! stage degrades to the generative provider with a spelling-only
//! instruction rather than failing outright.

use super::{prompts, StageResult};
use crate::llm::GenerativeProvider;
use crate::speller::{SpellChecker, SpellCorrection};

/// Hard ceiling on text submitted to the spelling service, in characters.
/// Longer input is truncated and the tail is dropped silently.
pub(crate) const MAX_SPELLER_CHARS: usize = 10_000;

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Splice correction candidates into `text`.
///
/// Corrections are applied highest offset first: replacement length may
/// differ from the original span, so applying in any other order would
/// invalidate the offsets of corrections that come before. Records
/// without candidates, and records whose span falls outside the text,
/// are skipped.
pub(crate) fn apply_corrections(text: &str, corrections: &[SpellCorrection]) -> String {
    let mut chars: Vec<char> = text.chars().collect();

    let mut ordered: Vec<&SpellCorrection> = corrections.iter().collect();
    ordered.sort_by(|a, b| b.pos.cmp(&a.pos));

    for correction in ordered {
        let Some(replacement) = correction.candidates.first() else {
            continue;
        };
        let end = correction.pos + correction.len;
        if end > chars.len() {
            log::warn!(
                "Spelling: correction span {}..{} is outside the text ({} chars), skipping",
                correction.pos,
                end,
                chars.len()
            );
            continue;
        }
        chars.splice(correction.pos..end, replacement.chars());
    }

    chars.into_iter().collect()
}

/// Correct spelling via the spell-check service, falling back to the
/// generative provider when the service fails.
pub async fn correct_spelling(
    speller: &dyn SpellChecker,
    fallback: Option<&dyn GenerativeProvider>,
    text: &str,
    languages: &[String],
) -> StageResult {
    if text.trim().is_empty() {
        return StageResult::passthrough(text);
    }

    let submitted = truncate_chars(text, MAX_SPELLER_CHARS);
    if submitted.len() < text.len() {
        log::debug!(
            "Spelling: input truncated to {} characters before submission",
            MAX_SPELLER_CHARS
        );
    }

    let primary_error = match speller.check(submitted, languages).await {
        Ok(corrections) => {
            log::debug!(
                "Spelling: {} correction(s) from {}",
                corrections.len(),
                speller.label()
            );
            return StageResult::success(
                apply_corrections(submitted, &corrections),
                speller.label(),
            );
        }
        Err(e) => e,
    };

    log::warn!(
        "Spelling: {} failed ({}), trying generative fallback",
        speller.label(),
        primary_error
    );

    let Some(fallback) = fallback else {
        return StageResult::failure(text, primary_error.to_string());
    };

    match fallback
        .generate(&prompts::spelling_fallback_prompt(submitted))
        .await
    {
        Ok(corrected) if !corrected.trim().is_empty() => StageResult::success(
            corrected.trim().to_string(),
            format!("{} (Spelling Fallback)", fallback.label()),
        ),
        Ok(_) => StageResult::failure(text, "spelling fallback returned empty text"),
        Err(e) => {
            log::warn!("Spelling: generative fallback failed ({})", e);
            StageResult::failure(text, e.to_string())
        }
    }
}
