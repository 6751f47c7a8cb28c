//! Worker configuration.

use std::path::PathBuf;

use shortcast_publish::PublishOptions;

/// Segment duration when none is configured.
pub const DEFAULT_SEGMENT_SECS: u32 = 30;

/// Worker configuration, loaded from the environment with defaults that
/// match the conventional working-directory layout.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Root working directory
    pub work_dir: PathBuf,
    /// Where encoded output and segments are written
    pub output_dir: PathBuf,
    /// Persisted content unit collection
    pub state_path: PathBuf,
    /// Fixed segment duration in seconds
    pub segment_secs: u32,
    /// Whisper model used for word-level transcription
    pub whisper_model: String,
    /// Upload privacy status ("private", "unlisted", "public")
    pub privacy_status: String,
    /// YouTube category id
    pub category_id: String,
    /// API tags (no # needed)
    pub tags: Vec<String>,
    /// Shared upload description
    pub description: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        let work_dir = PathBuf::from(".");
        Self {
            output_dir: work_dir.join("output"),
            state_path: work_dir.join("units.json"),
            work_dir,
            segment_secs: DEFAULT_SEGMENT_SECS,
            whisper_model: "base".to_string(),
            privacy_status: "public".to_string(),
            category_id: "22".to_string(),
            tags: vec!["stories".to_string(), "shorts".to_string()],
            description: "#stories #shorts\n\nAuto-uploaded.".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let work_dir = std::env::var("WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.work_dir);

        Self {
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| work_dir.join("output")),
            state_path: std::env::var("STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| work_dir.join("units.json")),
            work_dir,
            segment_secs: std::env::var("SEGMENT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SEGMENT_SECS),
            whisper_model: std::env::var("WHISPER_MODEL").unwrap_or(defaults.whisper_model),
            privacy_status: std::env::var("YT_PRIVACY_STATUS").unwrap_or(defaults.privacy_status),
            category_id: std::env::var("YT_CATEGORY_ID").unwrap_or(defaults.category_id),
            tags: std::env::var("YT_TAGS")
                .map(|t| {
                    t.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.tags),
            description: std::env::var("YT_DESCRIPTION").unwrap_or(defaults.description),
        }
    }

    /// Per-run upload metadata shared by every segment.
    pub fn publish_options(&self) -> PublishOptions {
        PublishOptions {
            description: self.description.clone(),
            tags: self.tags.clone(),
            category_id: self.category_id.clone(),
            privacy_status: self.privacy_status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.segment_secs, 30);
        assert_eq!(config.category_id, "22");
        assert_eq!(config.state_path, PathBuf::from("./units.json"));
    }

    #[test]
    fn test_publish_options_mirror_config() {
        let config = WorkerConfig {
            privacy_status: "unlisted".to_string(),
            tags: vec!["a".to_string()],
            ..WorkerConfig::default()
        };
        let options = config.publish_options();
        assert_eq!(options.privacy_status, "unlisted");
        assert_eq!(options.tags, vec!["a".to_string()]);
    }
}
