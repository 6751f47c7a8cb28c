//! Content unit lifecycle records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The durable record for one piece of content.
///
/// This is the single source of truth for the publish lifecycle and must
/// be persisted after every state-changing step, so a crash mid-run loses
/// at most one in-flight operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentUnit {
    /// Stable identifier from the content source
    pub id: String,
    /// Human title of the source content
    pub title: String,
    /// Synthesized narration audio
    pub narration_audio: PathBuf,
    /// Background gameplay/stock video
    pub background_video: PathBuf,
    /// Low-volume ambient sound bed
    pub ambient_audio: PathBuf,
    /// Encoded segment files, in part order; populated after encode+split
    #[serde(default)]
    pub segments: Vec<PathBuf>,
    /// Segments accepted by the remote platform; append-only
    #[serde(default)]
    pub uploaded_segments: Vec<PathBuf>,
    /// True once `uploaded_segments` covers `segments` without errors
    #[serde(default)]
    pub uploaded: bool,
    /// Creation time of this record
    pub created_at: DateTime<Utc>,
}

impl ContentUnit {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        narration_audio: impl Into<PathBuf>,
        background_video: impl Into<PathBuf>,
        ambient_audio: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            narration_audio: narration_audio.into(),
            background_video: background_video.into(),
            ambient_audio: ambient_audio.into(),
            segments: Vec::new(),
            uploaded_segments: Vec::new(),
            uploaded: false,
            created_at: Utc::now(),
        }
    }

    /// Segments not yet accepted by the remote platform, in part order.
    pub fn pending_segments(&self) -> Vec<PathBuf> {
        self.segments
            .iter()
            .filter(|s| !self.uploaded_segments.contains(s))
            .cloned()
            .collect()
    }

    /// Record a segment as uploaded. Appending twice is a no-op.
    pub fn record_uploaded(&mut self, segment: &Path) {
        if !self.uploaded_segments.iter().any(|s| s == segment) {
            self.uploaded_segments.push(segment.to_path_buf());
        }
    }

    /// True when every known segment has been uploaded.
    pub fn all_segments_uploaded(&self) -> bool {
        !self.segments.is_empty()
            && self
                .segments
                .iter()
                .all(|s| self.uploaded_segments.contains(s))
    }
}

/// Outcome of one publisher batch run. Transient, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRunResult {
    /// True when a hard quota condition halted the batch
    pub stopped_early: bool,
    /// Halt reason, when stopped early
    pub reason: Option<String>,
}

impl PublishRunResult {
    /// The batch ran to the end of the store.
    pub fn completed() -> Self {
        Self {
            stopped_early: false,
            reason: None,
        }
    }

    /// The batch was halted by a quota-exhaustion signal.
    pub fn halted(reason: impl Into<String>) -> Self {
        Self {
            stopped_early: true,
            reason: Some(reason.into()),
        }
    }
}
