//! End-to-end pipeline scenarios against scripted providers.
//!
//! These tests exercise the whole orchestrator through the public
//! `CorrectionPipeline` surface: stage sequencing, working-text
//! composition, fallback tiers, and degradation when providers are down.

use crate::config::{Mode, PipelineConfig, Tone};
use crate::correct::StageResult;
use crate::llm::{ChatProvider, GenerativeProvider, LlmError};
use crate::pipeline::CorrectionPipeline;
use crate::speller::{SpellChecker, SpellCorrection, SpellerError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct ScriptedSpeller {
    calls: AtomicUsize,
    corrections: Option<Vec<SpellCorrection>>,
}

impl ScriptedSpeller {
    fn succeeding(corrections: Vec<SpellCorrection>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            corrections: Some(corrections),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            corrections: None,
        })
    }
}

#[async_trait]
impl SpellChecker for ScriptedSpeller {
    async fn check(
        &self,
        _text: &str,
        _languages: &[String],
    ) -> Result<Vec<SpellCorrection>, SpellerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.corrections {
            Some(corrections) => Ok(corrections.clone()),
            None => Err(SpellerError::Api {
                status: 502,
                message: "scripted outage".to_string(),
            }),
        }
    }

    fn label(&self) -> &str {
        "Yandex.Speller"
    }
}

struct ScriptedGenerative {
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    response: Option<String>,
}

impl ScriptedGenerative {
    fn succeeding(text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            response: Some(text.to_string()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            response: None,
        })
    }
}

#[async_trait]
impl GenerativeProvider for ScriptedGenerative {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(LlmError::RateLimited("quota exceeded".to_string())),
        }
    }

    fn label(&self) -> &str {
        "Gemini"
    }
}

struct ScriptedChat {
    label: &'static str,
    calls: AtomicUsize,
    user_messages: Mutex<Vec<String>>,
    response: Option<String>,
}

impl ScriptedChat {
    fn succeeding(label: &'static str, text: &str) -> Arc<Self> {
        Arc::new(Self {
            label,
            calls: AtomicUsize::new(0),
            user_messages: Mutex::new(Vec::new()),
            response: Some(text.to_string()),
        })
    }

    fn failing(label: &'static str) -> Arc<Self> {
        Arc::new(Self {
            label,
            calls: AtomicUsize::new(0),
            user_messages: Mutex::new(Vec::new()),
            response: None,
        })
    }
}

#[async_trait]
impl ChatProvider for ScriptedChat {
    async fn complete(&self, _system_prompt: &str, user_message: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.user_messages.lock().unwrap().push(user_message.to_string());
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(LlmError::Server {
                status: 503,
                message: "scripted outage".to_string(),
            }),
        }
    }

    fn label(&self) -> &str {
        self.label
    }
}

fn no_op_correction(word: &str) -> SpellCorrection {
    SpellCorrection {
        code: 1,
        pos: 0,
        row: 0,
        col: 0,
        len: word.chars().count(),
        word: word.to_string(),
        candidates: vec![word.to_string()],
    }
}

fn stage_provider(result: &Option<StageResult>) -> Option<&str> {
    result.as_ref().and_then(|r| r.provider.as_deref())
}

#[tokio::test]
async fn test_end_to_end_general_mode() {
    init_logging();

    // Spelling reports one correction that leaves "privet" unchanged;
    // punctuation tier 1 supplies the terminal punctuation.
    let speller = ScriptedSpeller::succeeding(vec![no_op_correction("privet")]);
    let generative = ScriptedGenerative::succeeding("Privet, kak dela.");
    let fast = ScriptedChat::succeeding("Groq (Llama 3.3 70B)", "unused");
    let pipeline = CorrectionPipeline::with_providers(
        speller.clone(),
        Some(generative.clone()),
        fast.clone(),
        None,
    );

    let config = PipelineConfig {
        mode: Mode::General,
        enable_spelling: true,
        enable_grammar: false,
        enable_punctuation: true,
        ..Default::default()
    };

    let result = pipeline.run("privet kak dela", &config).await;

    assert!(result.succeeded);
    assert_eq!(result.original_text, "privet kak dela");
    assert!(result.final_text.ends_with('.'));
    assert_eq!(stage_provider(&result.stages.spelling), Some("Yandex.Speller"));
    assert_eq!(stage_provider(&result.stages.punctuation), Some("Gemini"));
    assert!(result.stages.grammar.is_none());
    assert_eq!(fast.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_grammar_failure_never_blocks_punctuation() {
    init_logging();

    // The generative provider is down, so grammar fails and punctuation
    // tier 1 fails with it; tier 2 still delivers the final text.
    let speller = ScriptedSpeller::succeeding(vec![]);
    let generative = ScriptedGenerative::failing();
    let fast = ScriptedChat::succeeding("Groq (Llama 3.3 70B)", "Привет. Как дела?");
    let pipeline = CorrectionPipeline::with_providers(
        speller,
        Some(generative.clone()),
        fast.clone(),
        None,
    );

    let config = PipelineConfig {
        enable_grammar: true,
        ..Default::default()
    };

    let result = pipeline.run("привет как дела", &config).await;

    let grammar = result.stages.grammar.as_ref().unwrap();
    assert!(!grammar.succeeded);

    let punctuation = result.stages.punctuation.as_ref().unwrap();
    assert!(punctuation.succeeded);
    assert_eq!(punctuation.provider.as_deref(), Some("Groq (Llama 3.3 70B)"));
    assert_eq!(result.final_text, "Привет. Как дела?");
}

#[tokio::test]
async fn test_corrections_compose_across_stages() {
    // The punctuation tier must receive the spelling stage's output, not
    // the original transcript.
    let speller = ScriptedSpeller::succeeding(vec![SpellCorrection {
        code: 1,
        pos: 0,
        row: 0,
        col: 0,
        len: 6,
        word: "превет".to_string(),
        candidates: vec!["привет".to_string()],
    }]);
    let fast = ScriptedChat::succeeding("Groq (Llama 3.3 70B)", "Привет, мир.");
    let pipeline = CorrectionPipeline::with_providers(speller, None, fast.clone(), None);

    let result = pipeline.run("превет мир", &PipelineConfig::default()).await;

    assert_eq!(result.final_text, "Привет, мир.");
    let seen = fast.user_messages.lock().unwrap();
    assert_eq!(seen[0], "привет мир");
}

#[tokio::test]
async fn test_spelling_failure_keeps_working_text_for_punctuation() {
    let speller = ScriptedSpeller::failing();
    let fast = ScriptedChat::succeeding("Groq (Llama 3.3 70B)", "Привет.");
    let pipeline = CorrectionPipeline::with_providers(speller.clone(), None, fast.clone(), None);

    let result = pipeline.run("привет", &PipelineConfig::default()).await;

    let spelling = result.stages.spelling.as_ref().unwrap();
    assert!(!spelling.succeeded);

    // The failed stage's output is discarded; punctuation sees the input.
    let seen = fast.user_messages.lock().unwrap();
    assert_eq!(seen[0], "привет");
    assert_eq!(result.final_text, "Привет.");
}

#[tokio::test]
async fn test_all_punctuation_tiers_down_degrades_to_original() {
    init_logging();

    let speller = ScriptedSpeller::succeeding(vec![]);
    let generative = ScriptedGenerative::failing();
    let fast = ScriptedChat::failing("Groq (Llama 3.3 70B)");
    let alternate = ScriptedChat::failing("DeepSeek");
    let pipeline = CorrectionPipeline::with_providers(
        speller,
        Some(generative),
        fast,
        Some(alternate.clone()),
    );

    let result = pipeline.run("привет как дела", &PipelineConfig::default()).await;

    // Overall run still completes; the punctuation stage reports failure.
    assert!(result.succeeded);
    assert_eq!(result.final_text, "привет как дела");
    let punctuation = result.stages.punctuation.as_ref().unwrap();
    assert!(!punctuation.succeeded);
    assert!(punctuation
        .error_message
        .as_deref()
        .unwrap()
        .contains("unavailable"));
    assert_eq!(alternate.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_disabled_stages_are_absent_from_the_result() {
    let speller = ScriptedSpeller::succeeding(vec![]);
    let fast = ScriptedChat::succeeding("Groq (Llama 3.3 70B)", "unused");
    let pipeline = CorrectionPipeline::with_providers(speller.clone(), None, fast.clone(), None);

    let config = PipelineConfig {
        enable_spelling: false,
        enable_grammar: false,
        enable_punctuation: false,
        ..Default::default()
    };

    let result = pipeline.run("привет", &config).await;

    assert!(result.succeeded);
    assert_eq!(result.final_text, "привет");
    assert!(result.stages.spelling.is_none());
    assert!(result.stages.grammar.is_none());
    assert!(result.stages.punctuation.is_none());
    assert_eq!(speller.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fast.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_standalone_punctuation_uses_tier_order() {
    let speller = ScriptedSpeller::succeeding(vec![]);
    let generative = ScriptedGenerative::failing();
    let fast = ScriptedChat::succeeding("Groq (Llama 3.3 70B)", "Привет.");
    let alternate = ScriptedChat::succeeding("DeepSeek", "unused");
    let pipeline = CorrectionPipeline::with_providers(
        speller,
        Some(generative),
        fast,
        Some(alternate.clone()),
    );

    let result = pipeline
        .correct_punctuation("привет", Mode::General, Tone::Default)
        .await;

    assert!(result.succeeded);
    assert_eq!(result.provider.as_deref(), Some("Groq (Llama 3.3 70B)"));
    assert_eq!(alternate.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_tone_applies_outside_general_mode() {
    let speller = ScriptedSpeller::succeeding(vec![]);
    let generative = ScriptedGenerative::succeeding("done");
    let fast = ScriptedChat::failing("Groq (Llama 3.3 70B)");
    let pipeline = CorrectionPipeline::with_providers(
        speller,
        Some(generative.clone()),
        fast,
        None,
    );

    let config = PipelineConfig {
        mode: Mode::Corrector,
        tone: Tone::Serious,
        enable_spelling: false,
        ..Default::default()
    };

    pipeline.run("привет", &config).await;

    let prompts = generative.prompts.lock().unwrap();
    assert!(prompts[0].contains("formal, strict"));
}
