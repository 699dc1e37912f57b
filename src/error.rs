//! Error types for Scout.

use thiserror::Error;

/// Library-level error type for Scout operations.
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("{0}")]
    Parse(String),

    #[error("Agent exceeded maximum tool rounds ({max_rounds})")]
    LoopExceeded { max_rounds: usize },

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Scout operations.
pub type Result<T> = std::result::Result<T, ScoutError>;
