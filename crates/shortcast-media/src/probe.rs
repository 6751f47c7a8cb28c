//! FFprobe media information.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// Container-level media information.
#[derive(Debug, Clone)]
pub struct MediaInfo {
    /// Duration in seconds
    pub duration: f64,
    /// File size in bytes
    pub size: u64,
    /// Bitrate in bits/second
    pub bitrate: u64,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    size: Option<String>,
    bit_rate: Option<String>,
}

/// Probe a media file for container information.
pub async fn probe_media(path: impl AsRef<Path>) -> MediaResult<MediaInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::ffprobe_failed(
            "FFprobe failed",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
        ));
    }

    parse_probe_output(&output.stdout)
}

/// Get media duration in seconds. Used to derive the trim target from the
/// narration audio's real duration.
pub async fn get_duration(path: impl AsRef<Path>) -> MediaResult<f64> {
    let info = probe_media(path).await?;
    Ok(info.duration)
}

fn parse_probe_output(stdout: &[u8]) -> MediaResult<MediaInfo> {
    let probe: FfprobeOutput = serde_json::from_slice(stdout)?;

    let duration = probe
        .format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| MediaError::invalid_media("no duration in probe output"))?;

    let size = probe
        .format
        .size
        .as_ref()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    let bitrate = probe
        .format
        .bit_rate
        .as_ref()
        .and_then(|b| b.parse::<u64>().ok())
        .unwrap_or(0);

    Ok(MediaInfo {
        duration,
        size,
        bitrate,
    })
}
