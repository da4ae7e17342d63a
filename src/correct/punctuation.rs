//! Punctuation/style correction stage.
//!
//! The most failure-protected stage: three provider tiers are walked in a
//! fixed order and the first usable result wins. Tier 1 (generative) is
//! preferred for quality; tiers 2 and 3 exist purely for availability, so
//! any tier-1 failure falls through unconditionally.

use super::{prompts, StageResult};
use crate::config::{Mode, Tone};
use crate::llm::{ChatProvider, GenerativeProvider};

/// Message set when every tier failed or was skipped.
const ALL_PROVIDERS_UNAVAILABLE: &str = "all punctuation correction providers unavailable";

/// The ordered provider tiers walked by [`correct_punctuation`].
pub struct PunctuationTiers<'a> {
    /// Tier 1: generative provider. Skipped when not configured.
    pub generative: Option<&'a dyn GenerativeProvider>,
    /// Tier 2: fast chat-completion provider. Always attempted.
    pub fast_chat: &'a dyn ChatProvider,
    /// Tier 3: alternate-vendor chat provider. Skipped when no key
    /// resolves for it.
    pub alternate_chat: Option<&'a dyn ChatProvider>,
}

/// Correct punctuation (and, outside general mode, style) by walking the
/// provider tiers in order.
pub async fn correct_punctuation(
    tiers: PunctuationTiers<'_>,
    text: &str,
    mode: Mode,
    tone: Tone,
    languages: &[String],
) -> StageResult {
    if text.trim().is_empty() {
        return StageResult::passthrough(text);
    }

    // Tier 1: generative provider, single-turn prompt variant.
    if let Some(generative) = tiers.generative {
        let prompt = prompts::punctuation_generative_prompt(text, mode, tone, languages);
        match generative.generate(&prompt).await {
            Ok(corrected) if !corrected.trim().is_empty() => {
                return StageResult::success(corrected.trim().to_string(), generative.label());
            }
            Ok(_) => {
                log::warn!(
                    "Punctuation: {} returned empty text, falling through",
                    generative.label()
                );
            }
            Err(e) if e.is_rate_limited() => {
                log::warn!(
                    "Punctuation: {} rate limited ({}), falling through",
                    generative.label(),
                    e
                );
            }
            Err(e) => {
                log::warn!(
                    "Punctuation: {} failed ({}), falling through",
                    generative.label(),
                    e
                );
            }
        }
    } else {
        log::debug!("Punctuation: no generative provider configured, starting at chat tier");
    }

    // Tiers 2 and 3: chat providers, system-instruction prompt variant.
    let system = prompts::punctuation_system_instruction(mode, tone, languages);

    match tiers.fast_chat.complete(&system, text).await {
        Ok(corrected) if !corrected.trim().is_empty() => {
            return StageResult::success(corrected.trim().to_string(), tiers.fast_chat.label());
        }
        Ok(_) => log::warn!(
            "Punctuation: {} returned empty text, falling through",
            tiers.fast_chat.label()
        ),
        Err(e) => log::warn!(
            "Punctuation: {} failed ({}), falling through",
            tiers.fast_chat.label(),
            e
        ),
    }

    if let Some(alternate) = tiers.alternate_chat {
        match alternate.complete(&system, text).await {
            Ok(corrected) if !corrected.trim().is_empty() => {
                return StageResult::success(corrected.trim().to_string(), alternate.label());
            }
            Ok(_) => log::warn!("Punctuation: {} returned empty text", alternate.label()),
            Err(e) => log::warn!("Punctuation: {} failed ({})", alternate.label(), e),
        }
    } else {
        log::debug!("Punctuation: no alternate chat provider configured");
    }

    StageResult::failure(text, ALL_PROVIDERS_UNAVAILABLE)
}
