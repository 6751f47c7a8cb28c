//! Encoder fallback runner.
//!
//! Configurations are tried strictly in priority order; the first one that
//! completes without an external-tool failure wins. A failed attempt's
//! diagnostics are logged before the next configuration is tried, and no
//! partial output file survives a failed attempt.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use shortcast_models::EncoderConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// The three source streams every encode consumes, in input order.
#[derive(Debug, Clone)]
pub struct EncodeSources {
    /// Input 0: background video
    pub background_video: PathBuf,
    /// Input 1: narration audio
    pub narration_audio: PathBuf,
    /// Input 2: ambient audio
    pub ambient_audio: PathBuf,
}

/// Seam for the external encode invocation.
///
/// The real implementation shells out to FFmpeg; tests script outcomes to
/// exercise the fallback order without a toolchain.
#[async_trait]
pub trait EncodeBackend: Send + Sync {
    async fn encode(
        &self,
        sources: &EncodeSources,
        filter_graph: &str,
        config: &EncoderConfig,
        output: &Path,
    ) -> MediaResult<()>;
}

/// FFmpeg-backed encode invocation.
#[derive(Debug, Default)]
pub struct FfmpegEncodeBackend;

impl FfmpegEncodeBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EncodeBackend for FfmpegEncodeBackend {
    async fn encode(
        &self,
        sources: &EncodeSources,
        filter_graph: &str,
        config: &EncoderConfig,
        output: &Path,
    ) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(output)
            .input(&sources.background_video)
            .input(&sources.narration_audio)
            .input(&sources.ambient_audio)
            .filter_complex(filter_graph)
            .map("[vout]")
            .map("[aout]")
            .output_args(config.to_output_args())
            .output_args(["-movflags", "+faststart"]);

        FfmpegRunner::new().run(&cmd).await
    }
}

/// Try encoder configurations in priority order until one succeeds.
///
/// Returns the configuration that produced the output. When every
/// configuration fails the partial output of the last attempt has already
/// been removed, so no corrupt artifact is left behind. A configuration
/// that failed is never retried within the same run.
pub async fn encode_with_fallback(
    backend: &dyn EncodeBackend,
    sources: &EncodeSources,
    filter_graph: &str,
    configs: &[EncoderConfig],
    output: &Path,
) -> MediaResult<EncoderConfig> {
    for config in configs {
        info!(encoder = %config.name, codec = %config.codec, "Trying encoder");

        match backend.encode(sources, filter_graph, config, output).await {
            Ok(()) => {
                info!(encoder = %config.name, output = %output.display(), "Encode succeeded");
                return Ok(config.clone());
            }
            Err(e) => {
                warn!(
                    encoder = %config.name,
                    diagnostics = e.diagnostics().unwrap_or(""),
                    "Encoder failed: {}",
                    e
                );
                // A failed attempt must not leave a partial artifact
                tokio::fs::remove_file(output).await.ok();
            }
        }
    }

    Err(MediaError::AllEncodersFailed {
        attempts: configs.len(),
    })
}
