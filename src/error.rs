// src/error.rs

//! Unified error handling for the agenda scraper.

use thiserror::Error;

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A source URL could not be parsed, or points outside the trusted
    /// host list. Should never occur with the built-in candidates.
    #[error("invalid source URL: {0}")]
    InvalidUrl(String),

    /// Transport or connection failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-200 HTTP response
    #[error("server error: status {0}")]
    Server(u16),

    /// Response body could not be decoded as UTF-8 text
    #[error("could not decode the agenda page")]
    Parse,

    /// Every candidate URL failed or yielded an empty set
    #[error("all agenda sources failed")]
    AllSourcesFailed,

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid-URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl(url.into())
    }
}
