//! Transcription collaborator seam.
//!
//! The caption builder only depends on the word/segment shape; the shipped
//! adapter shells out to the `whisper` CLI with word timestamps enabled
//! and parses its JSON output from a scratch directory.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use shortcast_models::{TimedWord, TranscriptSegment};

use crate::error::{MediaError, MediaResult};

/// Produces word-level timing data from a narration audio file.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> MediaResult<Vec<TranscriptSegment>>;
}

/// Whisper CLI adapter.
#[derive(Debug, Clone)]
pub struct WhisperCli {
    binary: String,
    model: String,
}

impl WhisperCli {
    /// Create an adapter using the given whisper model ("tiny", "base", ...).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            binary: "whisper".to_string(),
            model: model.into(),
        }
    }

    /// Override the whisper executable name.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    async fn transcribe(&self, audio: &Path) -> MediaResult<Vec<TranscriptSegment>> {
        which::which(&self.binary)
            .map_err(|_| MediaError::TranscriberNotFound(self.binary.clone()))?;

        if !audio.exists() {
            return Err(MediaError::FileNotFound(audio.to_path_buf()));
        }

        info!("Transcribing {} with whisper/{}", audio.display(), self.model);

        // Whisper writes one output file per format into --output_dir;
        // a scratch dir keeps the working tree clean and auto-removes.
        let scratch = tempfile::tempdir()?;

        let output = Command::new(&self.binary)
            .args(["--model", &self.model])
            .args(["--word_timestamps", "True"])
            .args(["--output_format", "json"])
            .arg("--output_dir")
            .arg(scratch.path())
            .arg(audio)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::transcription_failed(format!(
                "whisper failed: {}",
                stderr.trim()
            )));
        }

        let stem = audio
            .file_stem()
            .ok_or_else(|| MediaError::invalid_media("narration path has no file stem"))?;
        let json_path = scratch.path().join(stem).with_extension("json");

        debug!("Reading whisper output from {}", json_path.display());
        let content = tokio::fs::read_to_string(&json_path).await?;

        parse_whisper_output(&content)
    }
}

#[derive(Debug, Deserialize)]
struct WhisperOutput {
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    #[serde(default)]
    words: Vec<WhisperWord>,
}

#[derive(Debug, Deserialize)]
struct WhisperWord {
    word: String,
    start: f64,
    end: f64,
}

/// Parse whisper's word-timestamped JSON into transcript segments.
///
/// Whisper emits words with leading whitespace; the literal word text is
/// kept otherwise.
fn parse_whisper_output(content: &str) -> MediaResult<Vec<TranscriptSegment>> {
    let parsed: WhisperOutput = serde_json::from_str(content)?;

    Ok(parsed
        .segments
        .into_iter()
        .map(|segment| {
            TranscriptSegment::new(
                segment
                    .words
                    .into_iter()
                    .map(|w| TimedWord::new(w.word.trim(), w.start, w.end))
                    .collect(),
            )
        })
        .collect())
}
