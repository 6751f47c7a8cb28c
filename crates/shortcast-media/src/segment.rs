//! Stream-copy segment splitting.
//!
//! A successfully encoded file is split into fixed-duration parts without
//! re-encoding. Part files are named `{unit_id}-part-{nnn}.mp4` with a
//! zero-padded 3-digit index starting at 001, so lexical order equals
//! part order.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// File name of one part: `{unit_id}-part-{nnn}.mp4`.
pub fn part_file_name(unit_id: &str, index: u32) -> String {
    format!("{}-part-{:03}.mp4", unit_id, index)
}

/// Split an encoded file into fixed-duration, stream-copied parts.
///
/// Returns the part paths sorted by index. The unsplit source file is
/// removed only after the parts are confirmed on disk; on any failure it
/// is left in place so the split can be retried.
pub async fn split_into_parts(
    encoded: &Path,
    unit_id: &str,
    out_dir: &Path,
    segment_secs: u32,
) -> MediaResult<Vec<PathBuf>> {
    if !encoded.exists() {
        return Err(MediaError::FileNotFound(encoded.to_path_buf()));
    }
    tokio::fs::create_dir_all(out_dir).await?;

    let pattern = out_dir.join(format!("{}-part-%03d.mp4", unit_id));
    let cmd = FfmpegCommand::new(&pattern)
        .input(encoded)
        .codec_copy()
        .format("segment")
        .output_args(["-segment_time", &segment_secs.to_string()])
        .output_args(["-segment_start_number", "1"])
        .output_args(["-reset_timestamps", "1"]);

    FfmpegRunner::new().run(&cmd).await?;

    let parts = collect_parts(out_dir, unit_id).await?;
    if parts.is_empty() {
        return Err(MediaError::SplitProducedNoSegments(encoded.to_path_buf()));
    }

    info!(
        unit = unit_id,
        parts = parts.len(),
        "Split {} into {} parts",
        encoded.display(),
        parts.len()
    );

    // Parts confirmed on disk, the unsplit file is no longer needed
    tokio::fs::remove_file(encoded).await?;

    Ok(parts)
}

/// Collect this unit's part files from `dir`, sorted by part index.
pub async fn collect_parts(dir: &Path, unit_id: &str) -> MediaResult<Vec<PathBuf>> {
    let prefix = format!("{}-part-", unit_id);
    let mut parts = Vec::new();

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(&prefix) && name.ends_with(".mp4") {
            parts.push(entry.path());
        }
    }

    // Zero-padded indexes make lexical order the part order
    parts.sort();
    Ok(parts)
}
