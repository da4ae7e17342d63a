//! Correction pipeline orchestration: spelling → grammar → punctuation.
//!
//! Stages run strictly sequentially. Each enabled stage receives the
//! output of the previous enabled stage, so corrections compose; a failed
//! stage's output is discarded and the working text carries over
//! unchanged. No stage failure stops the stages after it.
//!
//! Provider adapters are injected at construction time from
//! [`ProviderSettings`]; `reconfigure` replaces the whole set atomically.
//! Runs snapshot the adapters under a short read lock and await outside
//! it, so a concurrent reconfigure never tears a run in half.

use crate::config::{Mode, PipelineConfig, ProviderSettings, Tone, DEFAULT_LANGUAGES};
use crate::correct::{self, PunctuationTiers, StageResult};
use crate::llm::{ChatCompletionClient, ChatProvider, GeminiClient, GenerativeProvider};
use crate::speller::{SpellChecker, YandexSpeller};
use std::sync::{Arc, RwLock};

/// Per-stage outcomes of one pipeline run. A `None` entry means the stage
/// was disabled by configuration.
#[derive(Debug, Clone, Default)]
pub struct StageOutcomes {
    pub spelling: Option<StageResult>,
    pub grammar: Option<StageResult>,
    pub punctuation: Option<StageResult>,
}

/// Aggregate result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub succeeded: bool,
    /// The input transcript, never mutated.
    pub original_text: String,
    /// Output of the last stage that succeeded with non-empty text, or
    /// `original_text` when no stage did.
    pub final_text: String,
    pub stages: StageOutcomes,
    pub error_message: Option<String>,
}

/// Provider adapter set; snapshotted per run.
#[derive(Clone)]
struct Providers {
    speller: Arc<dyn SpellChecker>,
    generative: Option<Arc<dyn GenerativeProvider>>,
    fast_chat: Arc<dyn ChatProvider>,
    alternate_chat: Option<Arc<dyn ChatProvider>>,
}

impl Providers {
    fn from_settings(settings: &ProviderSettings) -> Self {
        let generative: Option<Arc<dyn GenerativeProvider>> = match &settings.gemini_api_key {
            Some(key) if !key.trim().is_empty() => Some(Arc::new(GeminiClient::new(key.clone()))),
            _ => {
                log::info!("Pipeline: no Gemini key configured; generative tier disabled");
                None
            }
        };

        let alternate_chat: Option<Arc<dyn ChatProvider>> =
            settings.resolved_deepseek_key().map(|key| {
                Arc::new(ChatCompletionClient::deepseek(
                    key,
                    settings.deepseek.base_url.clone(),
                    settings.deepseek.model.clone(),
                )) as Arc<dyn ChatProvider>
            });

        Self {
            speller: Arc::new(YandexSpeller::new()),
            generative,
            fast_chat: Arc::new(ChatCompletionClient::groq(settings.groq_api_key.clone())),
            alternate_chat,
        }
    }
}

/// The transcript correction pipeline.
pub struct CorrectionPipeline {
    providers: RwLock<Providers>,
}

impl CorrectionPipeline {
    /// Build the production adapter set from provider settings.
    pub fn new(settings: &ProviderSettings) -> Self {
        Self {
            providers: RwLock::new(Providers::from_settings(settings)),
        }
    }

    /// Construct from explicit provider instances. This is the seam the
    /// tests use; [`CorrectionPipeline::new`] wires the production
    /// adapters through the same fields.
    pub fn with_providers(
        speller: Arc<dyn SpellChecker>,
        generative: Option<Arc<dyn GenerativeProvider>>,
        fast_chat: Arc<dyn ChatProvider>,
        alternate_chat: Option<Arc<dyn ChatProvider>>,
    ) -> Self {
        Self {
            providers: RwLock::new(Providers {
                speller,
                generative,
                fast_chat,
                alternate_chat,
            }),
        }
    }

    /// Replace every provider adapter from new settings, atomically.
    /// In-flight runs keep the snapshot they started with.
    pub fn reconfigure(&self, settings: &ProviderSettings) {
        let next = Providers::from_settings(settings);
        let mut guard = self.providers.write().unwrap_or_else(|e| e.into_inner());
        *guard = next;
        log::info!("Pipeline: providers reconfigured");
    }

    fn snapshot(&self) -> Providers {
        self.providers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Run the enabled stages over `text` and aggregate the outcome.
    pub async fn run(&self, text: &str, config: &PipelineConfig) -> PipelineResult {
        let providers = self.snapshot();
        let original = text.to_string();
        let mut working = original.clone();
        let mut stages = StageOutcomes::default();

        log::info!(
            "Pipeline: run start ({} chars, {:?} mode)",
            original.chars().count(),
            config.mode
        );

        if config.enable_spelling {
            let result = correct::correct_spelling(
                providers.speller.as_ref(),
                providers.generative.as_deref(),
                &working,
                &config.languages,
            )
            .await;
            apply_stage("spelling", &mut working, &result);
            stages.spelling = Some(result);
        }

        if config.enable_grammar {
            let result =
                correct::correct_grammar(providers.generative.as_deref(), &working, config.mode)
                    .await;
            apply_stage("grammar", &mut working, &result);
            stages.grammar = Some(result);
        }

        if config.enable_punctuation {
            let tiers = PunctuationTiers {
                generative: providers.generative.as_deref(),
                fast_chat: providers.fast_chat.as_ref(),
                alternate_chat: providers.alternate_chat.as_deref(),
            };
            let result = correct::correct_punctuation(
                tiers,
                &working,
                config.mode,
                config.tone,
                &config.languages,
            )
            .await;
            apply_stage("punctuation", &mut working, &result);
            stages.punctuation = Some(result);
        }

        log::info!("Pipeline: run complete ({} chars out)", working.chars().count());

        PipelineResult {
            succeeded: true,
            original_text: original,
            final_text: working,
            stages,
            error_message: None,
        }
    }

    /// Run only the spelling stage against the current adapters.
    pub async fn correct_spelling(&self, text: &str, languages: &[String]) -> StageResult {
        let providers = self.snapshot();
        correct::correct_spelling(
            providers.speller.as_ref(),
            providers.generative.as_deref(),
            text,
            languages,
        )
        .await
    }

    /// Run only the grammar stage against the current adapters.
    pub async fn correct_grammar(&self, text: &str, mode: Mode) -> StageResult {
        let providers = self.snapshot();
        correct::correct_grammar(providers.generative.as_deref(), text, mode).await
    }

    /// Run only the punctuation stage against the current adapters, with
    /// the default language set.
    pub async fn correct_punctuation(&self, text: &str, mode: Mode, tone: Tone) -> StageResult {
        let providers = self.snapshot();
        let languages: Vec<String> = DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect();
        let tiers = PunctuationTiers {
            generative: providers.generative.as_deref(),
            fast_chat: providers.fast_chat.as_ref(),
            alternate_chat: providers.alternate_chat.as_deref(),
        };
        correct::correct_punctuation(tiers, text, mode, tone, &languages).await
    }
}

/// Advance the working text iff the stage succeeded with non-empty output.
fn apply_stage(name: &str, working: &mut String, result: &StageResult) {
    if result.succeeded && !result.text.trim().is_empty() {
        log::debug!(
            "Pipeline: {} stage succeeded via {}",
            name,
            result.provider.as_deref().unwrap_or("no provider")
        );
        *working = result.text.clone();
    } else if !result.succeeded {
        log::warn!(
            "Pipeline: {} stage failed ({}), keeping previous text",
            name,
            result.error_message.as_deref().unwrap_or("unknown error")
        );
    }
}
