//! Media integration tests.
//!
//! These exercise the real FFmpeg toolchain and are skipped by default.

use std::path::PathBuf;

/// Test that the toolchain pre-flight checks find the binaries.
#[tokio::test]
#[ignore = "requires ffmpeg/ffprobe in PATH"]
async fn test_toolchain_available() {
    shortcast_media::check_ffmpeg().expect("ffmpeg not found");
    shortcast_media::check_ffprobe().expect("ffprobe not found");
}

/// Test stream-copy splitting of a real encoded file.
///
/// A 95 second input with the default 30 second segment duration must
/// produce parts 001 through 004.
#[tokio::test]
#[ignore = "requires ffmpeg and a fixture file"]
async fn test_split_95s_fixture_into_four_parts() {
    let fixture = PathBuf::from(
        std::env::var("SHORTCAST_FIXTURE_95S").expect("set SHORTCAST_FIXTURE_95S to a 95s mp4"),
    );
    let out_dir = tempfile::tempdir().unwrap();

    // Work on a copy, the segmenter removes its input on success
    let input = out_dir.path().join("fixture.mp4");
    tokio::fs::copy(&fixture, &input).await.unwrap();

    let parts = shortcast_media::split_into_parts(&input, "fixture", out_dir.path(), 30)
        .await
        .expect("split failed");

    let names: Vec<String> = parts
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "fixture-part-001.mp4",
            "fixture-part-002.mp4",
            "fixture-part-003.mp4",
            "fixture-part-004.mp4",
        ]
    );
    assert!(!input.exists(), "source must be removed after a clean split");
}

/// Probe a real narration file for its duration.
#[tokio::test]
#[ignore = "requires ffprobe and a fixture file"]
async fn test_probe_narration_duration() {
    let fixture = PathBuf::from(
        std::env::var("SHORTCAST_FIXTURE_AUDIO").expect("set SHORTCAST_FIXTURE_AUDIO to an mp3"),
    );
    let duration = shortcast_media::get_duration(&fixture).await.unwrap();
    assert!(duration > 0.0);
}
