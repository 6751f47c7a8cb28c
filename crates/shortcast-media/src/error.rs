//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("Transcriber '{0}' not found in PATH")]
    TranscriberNotFound(String),

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("All {attempts} encoder configurations failed")]
    AllEncodersFailed { attempts: usize },

    #[error("Segment split produced no segments for {0}")]
    SplitProducedNoSegments(PathBuf),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid media file: {0}")]
    InvalidMedia(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create an FFprobe failure error.
    pub fn ffprobe_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::FfprobeFailed {
            message: message.into(),
            stderr,
        }
    }

    /// Create a transcription failure error.
    pub fn transcription_failed(message: impl Into<String>) -> Self {
        Self::TranscriptionFailed(message.into())
    }

    /// Create an invalid media error.
    pub fn invalid_media(message: impl Into<String>) -> Self {
        Self::InvalidMedia(message.into())
    }

    /// Diagnostic output captured from the external tool, if any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::FfmpegFailed { stderr, .. } | Self::FfprobeFailed { stderr, .. } => {
                stderr.as_deref()
            }
            _ => None,
        }
    }
}
