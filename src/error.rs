//! Error types for corscheck

use thiserror::Error;

/// Main error type for corscheck operations
#[derive(Debug, Error)]
pub enum CorsCheckError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Result type alias for corscheck operations
pub type Result<T> = std::result::Result<T, CorsCheckError>;
