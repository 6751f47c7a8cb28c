//! Publish error types.

use thiserror::Error;

/// Result type for publish operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors that can occur while publishing.
///
/// Quota exhaustion is a distinguished variant so callers can branch on
/// the error kind instead of platform-specific response shapes.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Upload quota exhausted: {0}")]
    QuotaExceeded(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("State store error: {0}")]
    StateStore(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn quota_exceeded(msg: impl Into<String>) -> Self {
        Self::QuotaExceeded(msg.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// True for the hard quota condition that must halt the whole batch.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, PublishError::QuotaExceeded(_))
    }
}
