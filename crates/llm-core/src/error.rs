//! Error Types

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, LlmError>;

/// Provider error types
#[derive(Error, Debug)]
pub enum LlmError {
    /// LLM provider returned an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Provider answered with something we could not decode
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl LlmError {
    /// Whether a later attempt could succeed. Nothing in this workspace
    /// retries; callers use it to pick a status code.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable(_) | Self::RateLimited(_))
    }
}
