//! Encoder configuration and the hardware-to-software fallback chain.

use serde::{Deserialize, Serialize};

/// Audio codec shared by every encoder configuration
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Audio bitrate shared by every encoder configuration
pub const DEFAULT_AUDIO_BITRATE: &str = "192k";
/// The software encoder every chain must end with
pub const SOFTWARE_CODEC: &str = "libx264";

/// One encoder configuration in the trial chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Human label used in logs ("NVIDIA NVENC", "software x264", ...)
    pub name: String,
    /// FFmpeg encoder identifier (e.g. "h264_nvenc", "libx264")
    pub codec: String,
    /// Extra FFmpeg output arguments specific to this encoder
    pub extra_args: Vec<String>,
}

impl EncoderConfig {
    pub fn new(name: impl Into<String>, codec: impl Into<String>, extra_args: &[&str]) -> Self {
        Self {
            name: name.into(),
            codec: codec.into(),
            extra_args: extra_args.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// True for the software encoder guaranteed to work on any host.
    pub fn is_software(&self) -> bool {
        self.codec == SOFTWARE_CODEC
    }

    /// Render this configuration as FFmpeg output arguments.
    pub fn to_output_args(&self) -> Vec<String> {
        let mut args = vec!["-c:v".to_string(), self.codec.clone()];
        args.extend(self.extra_args.clone());
        args.extend([
            "-c:a".to_string(),
            DEFAULT_AUDIO_CODEC.to_string(),
            "-b:a".to_string(),
            DEFAULT_AUDIO_BITRATE.to_string(),
        ]);
        args
    }
}

/// The static trial-priority chain: fastest hardware first, the software
/// encoder last. The chain is non-empty and always ends with a
/// software-only configuration.
pub fn encoder_priority() -> Vec<EncoderConfig> {
    vec![
        EncoderConfig::new(
            "NVIDIA NVENC",
            "h264_nvenc",
            &["-preset", "p4", "-rc", "vbr", "-cq", "23", "-b:v", "0"],
        ),
        EncoderConfig::new(
            "Intel Quick Sync",
            "h264_qsv",
            &["-preset", "fast", "-global_quality", "23"],
        ),
        EncoderConfig::new(
            "software x264",
            SOFTWARE_CODEC,
            &["-preset", "veryfast", "-crf", "23"],
        ),
    ]
}
