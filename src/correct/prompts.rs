//! Instruction templates for the correction stages.
//!
//! Every punctuation instruction exists in two phrasings: one for the
//! generative adapter's single-turn content format (instruction and text
//! in one prompt) and one as a system instruction for the chat
//! adapter's two-message format. The two variants encode the same policy
//! and differ only in phrasing convention.

use crate::config::{Mode, Tone};

pub(crate) fn tone_directive(tone: Tone) -> Option<&'static str> {
    match tone {
        Tone::Default => None,
        Tone::Friendly => Some("Use a warm, conversational tone."),
        Tone::Serious => Some("Use a formal, strict tone."),
        Tone::Professional => Some("Use a polished, business-appropriate tone."),
    }
}

fn punctuation_instruction(mode: Mode, tone: Tone, languages: &[String]) -> String {
    let languages = languages.join(", ");
    match mode {
        Mode::General => format!(
            "Insert sentence-ending and clause punctuation according to the combined \
             rules of these languages: {languages}. Preserve every word exactly as \
             written; do not reword, reorder or restyle anything."
        ),
        _ => {
            let mut instruction = format!(
                "Correct the punctuation according to the combined rules of these \
                 languages: {languages}. Light rewording is allowed as long as the \
                 core meaning is preserved."
            );
            if let Some(directive) = tone_directive(tone) {
                instruction.push(' ');
                instruction.push_str(directive);
            }
            instruction
        }
    }
}

/// Single-turn variant for the generative adapter.
pub(crate) fn punctuation_generative_prompt(
    text: &str,
    mode: Mode,
    tone: Tone,
    languages: &[String],
) -> String {
    format!(
        "{}\nReturn only the corrected text with no commentary.\n\n{}",
        punctuation_instruction(mode, tone, languages),
        text
    )
}

/// System-instruction variant for the chat adapter; the raw transcript
/// goes in the user message.
pub(crate) fn punctuation_system_instruction(
    mode: Mode,
    tone: Tone,
    languages: &[String],
) -> String {
    format!(
        "You correct the punctuation of dictation transcripts. {} Reply with the \
         corrected text only, no commentary.",
        punctuation_instruction(mode, tone, languages)
    )
}

pub(crate) fn spelling_fallback_prompt(text: &str) -> String {
    format!(
        "Fix spelling errors only. Preserve the grammar, punctuation and style \
         exactly as written.\nReturn only the corrected text with no commentary.\n\n{}",
        text
    )
}

pub(crate) fn grammar_prompt(text: &str) -> String {
    format!(
        "Fix only grammatical errors (case, tense, agreement). Preserve the \
         spelling and punctuation exactly as written.\nReturn only the corrected \
         text with no commentary.\n\n{}",
        text
    )
}
