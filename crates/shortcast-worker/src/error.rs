//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Media error: {0}")]
    Media(#[from] shortcast_media::MediaError),

    #[error("Publish error: {0}")]
    Publish(#[from] shortcast_publish::PublishError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
