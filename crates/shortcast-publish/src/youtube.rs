//! YouTube Data API upload client.
//!
//! Uses the resumable upload protocol: an initiation request returns a
//! session URL in the `Location` header, then the file bytes are PUT to
//! that URL. OAuth token acquisition is out of scope; the client takes a
//! ready bearer token.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{PublishError, PublishResult};

/// Videos upload endpoint.
const UPLOAD_ENDPOINT: &str = "https://www.googleapis.com/upload/youtube/v3/videos";

/// YouTube caps titles at 100 characters.
pub const MAX_TITLE_LEN: usize = 100;

/// API error reasons that mean the daily upload quota is gone.
const QUOTA_REASONS: &[&str] = &[
    "quotaExceeded",
    "uploadLimitExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
];

/// Metadata for one uploaded video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    /// YouTube category id ("22" = People & Blogs)
    pub category_id: String,
    /// "private", "unlisted" or "public"
    pub privacy_status: String,
}

impl VideoMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tags,
            category_id: "22".to_string(),
            privacy_status: "public".to_string(),
        }
    }

    /// Title clamped to the platform limit, on a char boundary.
    pub fn clamped_title(&self) -> String {
        self.title.chars().take(MAX_TITLE_LEN).collect()
    }
}

/// YouTube Data API client.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    access_token: String,
}

impl YouTubeClient {
    /// Create a client with a ready OAuth bearer token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token: access_token.into(),
        }
    }

    /// Create a client from the `YT_ACCESS_TOKEN` environment variable.
    pub fn from_env() -> PublishResult<Self> {
        let token = std::env::var("YT_ACCESS_TOKEN")
            .map_err(|_| PublishError::config_error("YT_ACCESS_TOKEN not set"))?;
        if token.trim().is_empty() {
            return Err(PublishError::config_error("YT_ACCESS_TOKEN is empty"));
        }
        Ok(Self::new(token.trim()))
    }

    /// Upload a video file, returning the remote video id.
    pub async fn upload_video(&self, file: &Path, meta: &VideoMetadata) -> PublishResult<String> {
        let session_url = self.initiate_resumable(meta).await?;
        debug!("Resumable session opened for {}", file.display());

        let bytes = tokio::fs::read(file).await?;
        let response = self
            .http
            .put(&session_url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, "video/*")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(classify_api_error(status, &body));
        }

        let uploaded: UploadResponse = serde_json::from_str(&body)?;
        let video_id = uploaded
            .id
            .ok_or_else(|| PublishError::upload_failed("no video id in upload response"))?;

        info!(
            "Uploaded {} -> https://youtu.be/{}",
            file.display(),
            video_id
        );
        Ok(video_id)
    }

    /// Open a resumable upload session and return its URL.
    async fn initiate_resumable(&self, meta: &VideoMetadata) -> PublishResult<String> {
        let body = json!({
            "snippet": {
                "title": meta.clamped_title(),
                "description": meta.description,
                "tags": meta.tags,
                "categoryId": meta.category_id,
            },
            "status": {
                "privacyStatus": meta.privacy_status,
            },
        });

        let response = self
            .http
            .post(format!(
                "{}?uploadType=resumable&part=snippet,status",
                UPLOAD_ENDPOINT
            ))
            .bearer_auth(&self.access_token)
            .header("X-Upload-Content-Type", "video/*")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status, &body));
        }

        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or_else(|| PublishError::upload_failed("no Location header in session response"))
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    reason: Option<String>,
}

/// Map an API error response onto the publish error taxonomy.
///
/// Quota reasons and HTTP 429 become [`PublishError::QuotaExceeded`] so
/// the publisher can halt the batch instead of skipping one unit.
fn classify_api_error(status: StatusCode, body: &str) -> PublishError {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();
    let error = parsed.and_then(|b| b.error);

    let reason = error
        .as_ref()
        .and_then(|e| e.errors.iter().filter_map(|d| d.reason.clone()).next());
    let message = error
        .and_then(|e| e.message)
        .unwrap_or_else(|| format!("HTTP {}", status));

    if status == StatusCode::TOO_MANY_REQUESTS
        || reason
            .as_deref()
            .is_some_and(|r| QUOTA_REASONS.contains(&r))
    {
        return PublishError::quota_exceeded(message);
    }

    if status == StatusCode::UNAUTHORIZED {
        return PublishError::auth(message);
    }

    PublishError::upload_failed(format!("{} ({})", message, status))
}
