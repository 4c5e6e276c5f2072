//! Process-wide configuration
//!
//! Loaded once at startup from the environment (after `.env` has been read)
//! and passed by value into the components that need it. Never mutated.

use std::env;
use tracing::debug;

/// Placeholder shipped in `.env.example`; treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "your_gemini_api_key_here";

/// Words that end the conversation wherever the user can type.
pub const EXIT_COMMANDS: &[&str] = &["quit", "exit", "stop", "bye"];

const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const APP_NAME: &str = "🤖 INTELLIGENT STOCK RESEARCH AGENT";

const WELCOME_MESSAGE: &str = "Hello! I'm your AI-powered stock research assistant.
I can help you with various stock-related tasks and will ask
intelligent questions based on what you want to accomplish.";

/// Sampling parameters sent with every question-generation request.
/// Kept small and focused so replies come back quickly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_output_tokens: 500,
            top_p: 0.8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub generation: GenerationSettings,
    pub exit_commands: Vec<String>,
    pub app_name: String,
    pub welcome_message: String,
}

impl Config {
    /// Build configuration from `GEMINI_API_KEY` and `GEMINI_MODEL`.
    pub fn from_env() -> Self {
        let gemini_api_key = env::var("GEMINI_API_KEY").ok();
        let gemini_model = env::var("GEMINI_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        debug!(model = %gemini_model, has_key = gemini_api_key.is_some(), "Configuration loaded");

        Self {
            gemini_api_key,
            gemini_model,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(api_key.into());
        self
    }

    /// A key is usable when present, non-blank, and not the placeholder.
    pub fn has_valid_api_key(&self) -> bool {
        match self.gemini_api_key.as_deref().map(str::trim) {
            Some(key) => !key.is_empty() && key != PLACEHOLDER_API_KEY,
            None => false,
        }
    }

    /// Case-insensitive, whitespace-trimmed exit keyword check
    pub fn is_exit_command(&self, text: &str) -> bool {
        let normalized = text.trim().to_lowercase();
        self.exit_commands.iter().any(|c| *c == normalized)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            generation: GenerationSettings::default(),
            exit_commands: EXIT_COMMANDS.iter().map(|c| c.to_string()).collect(),
            app_name: APP_NAME.to_string(),
            welcome_message: WELCOME_MESSAGE.to_string(),
        }
    }
}
