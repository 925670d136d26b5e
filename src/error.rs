// SPDX-License-Identifier: MIT

//! Error types for Ordo

use thiserror::Error;

/// Result type alias for Ordo operations
pub type Result<T> = std::result::Result<T, OrdoError>;

/// Ordo error types
#[derive(Error, Debug)]
pub enum OrdoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Gemini not available: {0}")]
    ApiUnavailable(String),

    #[error("Tool error: {0}")]
    Tool(String),
}

impl OrdoError {
    /// Whether this error should be retried with backoff
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, OrdoError::RateLimited(_))
    }
}
