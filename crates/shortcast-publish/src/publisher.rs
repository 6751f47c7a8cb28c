//! Resumable segmented publisher.
//!
//! Walks pending content units in store order and uploads one segment at
//! a time, persisting after every accepted segment. A quota-exhaustion
//! signal halts the whole batch; any other upload error aborts only the
//! current unit. Already-accepted segments are never re-uploaded.

use async_trait::async_trait;
use std::path::Path;
use tracing::{error, info, warn};

use shortcast_models::{ContentUnit, PublishRunResult};

use crate::error::PublishResult;
use crate::state::StateStore;
use crate::youtube::{VideoMetadata, YouTubeClient};

/// Uploads one file to the remote platform.
#[async_trait]
pub trait VideoPublisher: Send + Sync {
    /// Upload a file, returning the remote identifier.
    async fn publish(&self, file: &Path, meta: &VideoMetadata) -> PublishResult<String>;
}

#[async_trait]
impl VideoPublisher for YouTubeClient {
    async fn publish(&self, file: &Path, meta: &VideoMetadata) -> PublishResult<String> {
        self.upload_video(file, meta).await
    }
}

/// Metadata shared by every segment upload of a run.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub description: String,
    pub tags: Vec<String>,
    pub category_id: String,
    pub privacy_status: String,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            description: "#stories #shorts\n\nAuto-uploaded.".to_string(),
            tags: vec!["stories".to_string(), "shorts".to_string()],
            category_id: "22".to_string(),
            privacy_status: "public".to_string(),
        }
    }
}

impl PublishOptions {
    fn metadata_for(&self, unit: &ContentUnit, segment: &Path) -> VideoMetadata {
        // Segment files are named {unit.id}-part-{nnn}.mp4; the stem is the
        // per-segment title.
        let title = segment
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| unit.id.clone());

        VideoMetadata {
            title,
            description: self.description.clone(),
            tags: self.tags.clone(),
            category_id: self.category_id.clone(),
            privacy_status: self.privacy_status.clone(),
        }
    }
}

/// Upload every pending segment of every pending unit.
///
/// Returns early with `stopped_early` when the platform signals quota
/// exhaustion; state persisted so far is kept either way.
pub async fn run_publish(
    store: &dyn StateStore,
    publisher: &dyn VideoPublisher,
    options: &PublishOptions,
) -> PublishResult<PublishRunResult> {
    let mut units = store.load().await?;

    for i in 0..units.len() {
        if units[i].uploaded {
            continue;
        }
        if units[i].segments.is_empty() {
            info!(unit = %units[i].id, "Skipping unit with no segments");
            continue;
        }

        let pending = units[i].pending_segments();
        let mut unit_failed = false;

        for segment in pending {
            let meta = options.metadata_for(&units[i], &segment);
            info!(unit = %units[i].id, segment = %segment.display(), title = %meta.title, "Uploading segment");

            match publisher.publish(&segment, &meta).await {
                Ok(remote_id) => {
                    info!(unit = %units[i].id, segment = %segment.display(), remote_id = %remote_id, "Segment accepted");
                    units[i].record_uploaded(&segment);
                    store.persist(&units).await?;
                }
                Err(e) if e.is_quota_exceeded() => {
                    warn!(unit = %units[i].id, segment = %segment.display(), "Quota exhausted, halting batch: {}", e);
                    store.persist(&units).await?;
                    return Ok(PublishRunResult::halted(e.to_string()));
                }
                Err(e) => {
                    error!(unit = %units[i].id, segment = %segment.display(), "Upload failed, moving to next unit: {}", e);
                    unit_failed = true;
                    break;
                }
            }
        }

        if !unit_failed && units[i].all_segments_uploaded() {
            units[i].uploaded = true;
            store.persist(&units).await?;
            info!(unit = %units[i].id, parts = units[i].segments.len(), "Unit fully uploaded");
        }
    }

    Ok(PublishRunResult::completed())
}

/// Remove local media of fully uploaded units.
///
/// Deletes each segment file and the narration audio; already-absent
/// files are a silent no-op, so re-running cleanup is safe.
pub async fn cleanup_uploaded(store: &dyn StateStore) -> PublishResult<()> {
    let units = store.load().await?;

    for unit in units.iter().filter(|u| u.uploaded) {
        for segment in &unit.segments {
            remove_if_exists(segment).await;
        }
        remove_if_exists(&unit.narration_audio).await;
        info!(unit = %unit.id, "Cleaned up local media");
    }

    Ok(())
}

async fn remove_if_exists(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublishError;
    use crate::state::JsonStateStore;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// In-memory store counting persists.
    struct MemoryStore {
        units: Mutex<Vec<ContentUnit>>,
        persists: Mutex<usize>,
    }

    impl MemoryStore {
        fn new(units: Vec<ContentUnit>) -> Self {
            Self {
                units: Mutex::new(units),
                persists: Mutex::new(0),
            }
        }

        fn snapshot(&self) -> Vec<ContentUnit> {
            self.units.lock().unwrap().clone()
        }

        fn persist_count(&self) -> usize {
            *self.persists.lock().unwrap()
        }
    }

    #[async_trait]
    impl StateStore for MemoryStore {
        async fn load(&self) -> PublishResult<Vec<ContentUnit>> {
            Ok(self.units.lock().unwrap().clone())
        }

        async fn persist(&self, units: &[ContentUnit]) -> PublishResult<()> {
            *self.units.lock().unwrap() = units.to_vec();
            *self.persists.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum Outcome {
        Quota,
        Fail,
    }

    /// Publisher that records calls and fails where scripted.
    struct ScriptedPublisher {
        outcomes: HashMap<PathBuf, Outcome>,
        calls: Mutex<Vec<PathBuf>>,
    }

    impl ScriptedPublisher {
        fn new() -> Self {
            Self {
                outcomes: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_with(mut self, path: impl Into<PathBuf>, outcome: Outcome) -> Self {
            self.outcomes.insert(path.into(), outcome);
            self
        }

        fn calls(&self) -> Vec<PathBuf> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VideoPublisher for ScriptedPublisher {
        async fn publish(&self, file: &Path, _meta: &VideoMetadata) -> PublishResult<String> {
            self.calls.lock().unwrap().push(file.to_path_buf());
            match self.outcomes.get(file) {
                Some(Outcome::Quota) => Err(PublishError::quota_exceeded("daily limit reached")),
                Some(Outcome::Fail) => Err(PublishError::upload_failed("500 backend error")),
                None => Ok(format!("vid-{}", self.calls.lock().unwrap().len())),
            }
        }
    }

    fn unit_with_parts(id: &str, parts: &[&str]) -> ContentUnit {
        let mut unit = ContentUnit::new(
            id,
            "A story",
            format!("tts/{}.mp3", id),
            "bg/clip.mp4",
            "amb/rain.mp3",
        );
        unit.segments = parts.iter().map(PathBuf::from).collect();
        unit
    }

    #[tokio::test]
    async fn test_resume_skips_already_uploaded_segments() {
        let mut unit = unit_with_parts("u1", &["s1.mp4", "s2.mp4", "s3.mp4"]);
        unit.record_uploaded(Path::new("s1.mp4"));
        let store = MemoryStore::new(vec![unit]);
        let publisher = ScriptedPublisher::new();

        let result = run_publish(&store, &publisher, &PublishOptions::default())
            .await
            .unwrap();

        assert!(!result.stopped_early);
        assert_eq!(
            publisher.calls(),
            vec![PathBuf::from("s2.mp4"), PathBuf::from("s3.mp4")]
        );

        let units = store.snapshot();
        assert!(units[0].uploaded);
        assert_eq!(units[0].uploaded_segments.len(), 3);
        // One persist per accepted segment plus the completion flag
        assert_eq!(store.persist_count(), 3);
    }

    #[tokio::test]
    async fn test_quota_halts_whole_batch() {
        let mut first = unit_with_parts("u1", &["s1.mp4", "s2.mp4", "s3.mp4"]);
        first.record_uploaded(Path::new("s1.mp4"));
        let second = unit_with_parts("u2", &["t1.mp4"]);
        let store = MemoryStore::new(vec![first, second]);
        let publisher = ScriptedPublisher::new().failing_with("s2.mp4", Outcome::Quota);

        let result = run_publish(&store, &publisher, &PublishOptions::default())
            .await
            .unwrap();

        assert!(result.stopped_early);
        assert!(result.reason.unwrap().contains("quota"));
        // s2 was attempted, nothing after it
        assert_eq!(publisher.calls(), vec![PathBuf::from("s2.mp4")]);

        let units = store.snapshot();
        assert_eq!(units[0].uploaded_segments, vec![PathBuf::from("s1.mp4")]);
        assert!(!units[0].uploaded);
        assert!(units[1].uploaded_segments.is_empty());
    }

    #[tokio::test]
    async fn test_other_error_aborts_unit_only() {
        let first = unit_with_parts("u1", &["s1.mp4", "s2.mp4"]);
        let second = unit_with_parts("u2", &["t1.mp4"]);
        let store = MemoryStore::new(vec![first, second]);
        let publisher = ScriptedPublisher::new().failing_with("s1.mp4", Outcome::Fail);

        let result = run_publish(&store, &publisher, &PublishOptions::default())
            .await
            .unwrap();

        assert!(!result.stopped_early);
        // s2 skipped after s1 failed; the next unit still ran
        assert_eq!(
            publisher.calls(),
            vec![PathBuf::from("s1.mp4"), PathBuf::from("t1.mp4")]
        );

        let units = store.snapshot();
        assert!(!units[0].uploaded);
        assert!(units[0].uploaded_segments.is_empty());
        assert!(units[1].uploaded);
    }

    #[tokio::test]
    async fn test_units_without_segments_are_skipped() {
        let store = MemoryStore::new(vec![unit_with_parts("u1", &[])]);
        let publisher = ScriptedPublisher::new();

        let result = run_publish(&store, &publisher, &PublishOptions::default())
            .await
            .unwrap();

        assert!(!result.stopped_early);
        assert!(publisher.calls().is_empty());
        assert!(!store.snapshot()[0].uploaded);
    }

    #[tokio::test]
    async fn test_already_uploaded_units_are_not_touched() {
        let mut unit = unit_with_parts("u1", &["s1.mp4"]);
        unit.record_uploaded(Path::new("s1.mp4"));
        unit.uploaded = true;
        let store = MemoryStore::new(vec![unit]);
        let publisher = ScriptedPublisher::new();

        run_publish(&store, &publisher, &PublishOptions::default())
            .await
            .unwrap();

        assert!(publisher.calls().is_empty());
        assert_eq!(store.persist_count(), 0);
    }

    #[tokio::test]
    async fn test_segment_title_is_file_stem() {
        let unit = unit_with_parts("user123", &["output/user123-part-002.mp4"]);
        let options = PublishOptions::default();
        let meta = options.metadata_for(&unit, Path::new("output/user123-part-002.mp4"));
        assert_eq!(meta.title, "user123-part-002");
    }

    #[tokio::test]
    async fn test_full_cycle_with_cleanup() {
        let dir = tempfile::tempdir().unwrap();

        // Real files on disk for the two segments and the narration audio
        let seg1 = dir.path().join("u1-part-001.mp4");
        let seg2 = dir.path().join("u1-part-002.mp4");
        let narration = dir.path().join("u1.mp3");
        for path in [&seg1, &seg2, &narration] {
            tokio::fs::write(path, b"media").await.unwrap();
        }

        let mut unit = ContentUnit::new("u1", "A story", &narration, "bg.mp4", "amb.mp3");
        unit.segments = vec![seg1.clone(), seg2.clone()];

        let store = JsonStateStore::new(dir.path().join("units.json"));
        store.persist(&[unit]).await.unwrap();

        let publisher = ScriptedPublisher::new();
        let result = run_publish(&store, &publisher, &PublishOptions::default())
            .await
            .unwrap();
        assert!(!result.stopped_early);

        let units = store.load().await.unwrap();
        assert!(units[0].uploaded);
        assert_eq!(units[0].uploaded_segments.len(), units[0].segments.len());

        cleanup_uploaded(&store).await.unwrap();
        assert!(!seg1.exists());
        assert!(!seg2.exists());
        assert!(!narration.exists());

        // Idempotent: files already gone
        cleanup_uploaded(&store).await.unwrap();
    }
}
