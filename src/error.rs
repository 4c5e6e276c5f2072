//! Error types for the stock research advisor

use thiserror::Error;

/// Result type alias for advisor operations
pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {

    // =============================
    // Question Generation Errors
    // =============================

    #[error("GEMINI_API_KEY not configured")]
    MissingApiKey,

    #[error("Gemini API error: {0}")]
    Gemini(String),

    #[error("Invalid question response: {0}")]
    InvalidResponse(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
