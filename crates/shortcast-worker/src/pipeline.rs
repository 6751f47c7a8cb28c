//! Render pass: turn pending content units into captioned segment files.

use std::path::PathBuf;
use tracing::{error, info};

use shortcast_media::{
    compose_filter_graph, encode_with_fallback, get_duration, split_into_parts, CaptionStyle,
    EncodeSources, FfmpegEncodeBackend, MediaError, Transcriber,
};
use shortcast_models::{encoder_priority, CaptionTrack, ContentUnit};
use shortcast_publish::StateStore;

use crate::config::WorkerConfig;
use crate::error::WorkerResult;

/// Render every unit that has no segments yet.
///
/// A unit that fails to render is logged and skipped this cycle; the rest
/// of the batch keeps going. Segment lists are persisted as soon as they
/// exist.
pub async fn run_render_pass(
    store: &dyn StateStore,
    transcriber: &dyn Transcriber,
    config: &WorkerConfig,
) -> WorkerResult<()> {
    let mut units = store.load().await?;

    for i in 0..units.len() {
        if units[i].uploaded || !units[i].segments.is_empty() {
            continue;
        }

        info!(unit = %units[i].id, "Rendering unit");
        match render_unit(&units[i], transcriber, config).await {
            Ok(parts) => {
                units[i].segments = parts;
                store.persist(&units).await?;
            }
            Err(e) => {
                error!(unit = %units[i].id, "Render failed, unit skipped this cycle: {}", e);
            }
        }
    }

    Ok(())
}

/// Render one unit: transcribe, build captions, encode with fallback,
/// split into parts.
///
/// The SRT file is transient: it is deleted after a successful
/// encode+split pass and retained on failure for diagnosis.
async fn render_unit(
    unit: &ContentUnit,
    transcriber: &dyn Transcriber,
    config: &WorkerConfig,
) -> WorkerResult<Vec<PathBuf>> {
    for path in [
        &unit.narration_audio,
        &unit.background_video,
        &unit.ambient_audio,
    ] {
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.clone()).into());
        }
    }

    // The video is truncated to the narration length, not the other way
    // around.
    let duration = get_duration(&unit.narration_audio).await?;

    let segments = transcriber.transcribe(&unit.narration_audio).await?;
    let track = CaptionTrack::from_segments(&segments);
    info!(unit = %unit.id, cues = track.len(), duration, "Caption track built");

    tokio::fs::create_dir_all(&config.output_dir).await?;
    let srt_path = config.output_dir.join(format!("{}.srt", unit.id));
    tokio::fs::write(&srt_path, track.to_srt()).await?;

    let graph = compose_filter_graph(&srt_path, duration, &CaptionStyle::default());
    let sources = EncodeSources {
        background_video: unit.background_video.clone(),
        narration_audio: unit.narration_audio.clone(),
        ambient_audio: unit.ambient_audio.clone(),
    };

    let encoded = config.output_dir.join(format!("{}.mp4", unit.id));
    let selected = encode_with_fallback(
        &FfmpegEncodeBackend::new(),
        &sources,
        &graph,
        &encoder_priority(),
        &encoded,
    )
    .await?;
    info!(unit = %unit.id, encoder = %selected.name, "Encoded with {}", selected.name);

    let parts = split_into_parts(&encoded, &unit.id, &config.output_dir, config.segment_secs).await?;

    // Encode and split both succeeded, the caption file has served its
    // purpose.
    tokio::fs::remove_file(&srt_path).await.ok();

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shortcast_models::TranscriptSegment;
    use shortcast_publish::JsonStateStore;
    use std::sync::Mutex;

    struct CountingTranscriber {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl Transcriber for CountingTranscriber {
        async fn transcribe(
            &self,
            _audio: &std::path::Path,
        ) -> shortcast_media::MediaResult<Vec<TranscriptSegment>> {
            *self.calls.lock().unwrap() += 1;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_rendered_and_uploaded_units_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("units.json"));

        let mut rendered = ContentUnit::new("done", "t", "n.mp3", "b.mp4", "a.mp3");
        rendered.segments = vec![PathBuf::from("done-part-001.mp4")];
        let mut uploaded = ContentUnit::new("gone", "t", "n.mp3", "b.mp4", "a.mp3");
        uploaded.uploaded = true;

        store.persist(&[rendered, uploaded]).await.unwrap();

        let transcriber = CountingTranscriber {
            calls: Mutex::new(0),
        };
        let config = WorkerConfig {
            work_dir: dir.path().to_path_buf(),
            output_dir: dir.path().join("output"),
            state_path: dir.path().join("units.json"),
            ..WorkerConfig::default()
        };

        run_render_pass(&store, &transcriber, &config).await.unwrap();

        // Neither unit needed rendering, so transcription never ran
        assert_eq!(*transcriber.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_source_media_skips_unit_without_failing_pass() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("units.json"));

        let unit = ContentUnit::new("u1", "t", "missing.mp3", "missing.mp4", "missing2.mp3");
        store.persist(&[unit]).await.unwrap();

        let transcriber = CountingTranscriber {
            calls: Mutex::new(0),
        };
        let config = WorkerConfig {
            work_dir: dir.path().to_path_buf(),
            output_dir: dir.path().join("output"),
            state_path: dir.path().join("units.json"),
            ..WorkerConfig::default()
        };

        // The pass itself succeeds; the unit is skipped this cycle
        run_render_pass(&store, &transcriber, &config).await.unwrap();

        let units = store.load().await.unwrap();
        assert!(units[0].segments.is_empty());
    }
}
