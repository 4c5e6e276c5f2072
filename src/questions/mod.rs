//! Question sources and the coordinator that picks between them
//!
//! The AI source is preferred whenever it is configured. Any failure it
//! reports is swallowed here and replaced by the static fallback, so callers
//! always get a question list of the same shape.

use crate::config::Config;
use crate::gemini::{GeminiClient, TextGenerator};
use crate::models::QuestionRecord;
use crate::Result;
use async_trait::async_trait;
use tracing::{info, warn};

pub mod ai;
pub mod fallback;
pub use ai::AiQuestionSource;
pub use fallback::FallbackQuestionSource;

/// Trait for producing follow-up questions from a goal
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate(&self, goal: &str) -> Result<Vec<QuestionRecord>>;
}

/// Unified question generator with AI and fallback capabilities
pub struct QuestionGenerator {
    config: Config,
    ai: Option<Box<dyn QuestionSource>>,
    fallback: FallbackQuestionSource,
}

impl QuestionGenerator {
    /// Enable the Gemini path when a usable key is configured
    pub fn new(config: Config) -> Self {
        let ai = if config.has_valid_api_key() {
            match GeminiClient::new(&config) {
                Ok(client) => {
                    info!(model = %config.gemini_model, "Gemini question generation enabled");
                    Some(Box::new(AiQuestionSource::new(Box::new(client))) as Box<dyn QuestionSource>)
                }
                Err(e) => {
                    warn!("Failed to initialize Gemini client: {}", e);
                    None
                }
            }
        } else {
            info!("No valid Gemini API key found, using fallback questions only");
            None
        };

        Self {
            config,
            ai,
            fallback: FallbackQuestionSource,
        }
    }

    /// Use any text generator as the AI backend
    pub fn with_generator(config: Config, generator: Box<dyn TextGenerator>) -> Self {
        Self::with_source(config, Box::new(AiQuestionSource::new(generator)))
    }

    pub fn with_source(config: Config, source: Box<dyn QuestionSource>) -> Self {
        Self {
            config,
            ai: Some(source),
            fallback: FallbackQuestionSource,
        }
    }

    /// Fallback questions only, never touches the network
    pub fn fallback_only(config: Config) -> Self {
        Self {
            config,
            ai: None,
            fallback: FallbackQuestionSource,
        }
    }

    pub fn is_ai_enabled(&self) -> bool {
        self.ai.is_some()
    }

    /// Generate questions for a goal. Never fails.
    pub async fn generate(&self, goal: &str) -> Vec<QuestionRecord> {
        if self.config.is_exit_command(goal) {
            return Vec::new();
        }

        if let Some(ai) = &self.ai {
            match ai.generate(goal).await {
                Ok(questions) => return questions,
                Err(e) => {
                    warn!("AI question generation failed, using smart fallback: {}", e);
                }
            }
        }

        self.fallback.questions_for(goal)
    }
}
