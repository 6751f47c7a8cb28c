//! Publish integration tests.
//!
//! These hit the real YouTube Data API and are skipped by default.

/// Test that credentials resolve from the environment.
#[tokio::test]
#[ignore = "requires YT_ACCESS_TOKEN"]
async fn test_client_from_env() {
    dotenvy::dotenv().ok();
    shortcast_publish::YouTubeClient::from_env().expect("Failed to create YouTube client");
}

/// Upload one small private video end to end.
#[tokio::test]
#[ignore = "requires YT_ACCESS_TOKEN and consumes upload quota"]
async fn test_upload_one_video() {
    dotenvy::dotenv().ok();

    let client = shortcast_publish::YouTubeClient::from_env().unwrap();
    let fixture = std::env::var("SHORTCAST_FIXTURE_UPLOAD")
        .expect("set SHORTCAST_FIXTURE_UPLOAD to a small mp4");

    let mut meta = shortcast_publish::VideoMetadata::new(
        "shortcast integration test",
        "integration test upload, safe to delete",
        vec!["test".to_string()],
    );
    meta.privacy_status = "private".to_string();

    let video_id = client
        .upload_video(std::path::Path::new(&fixture), &meta)
        .await
        .expect("upload failed");
    println!("Uploaded: https://youtu.be/{}", video_id);
}
