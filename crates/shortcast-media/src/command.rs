//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Builder for FFmpeg commands over one or more input files.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file paths, in `-i` order
    inputs: Vec<PathBuf>,
    /// Output file path (or output pattern for the segment muxer)
    output: PathBuf,
    /// Global arguments placed before the first `-i`
    input_args: Vec<String>,
    /// Output arguments placed after the inputs
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command writing to `output`.
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an input file.
    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        self.inputs.push(path.as_ref().to_path_buf());
        self
    }

    /// Add a global argument (before the inputs).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add an output argument.
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set filter complex.
    pub fn filter_complex(self, filter: impl Into<String>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    /// Map a stream or filter label into the output.
    pub fn map(self, label: impl Into<String>) -> Self {
        self.output_arg("-map").output_arg(label)
    }

    /// Stream-copy all codecs.
    pub fn codec_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    /// Set the output container/muxer format.
    pub fn format(self, fmt: impl Into<String>) -> Self {
        self.output_arg("-f").output_arg(fmt)
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Output path this command writes to.
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        args.extend(self.input_args.clone());

        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.to_string_lossy().to_string());
        }

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with captured diagnostics.
#[derive(Debug, Default)]
pub struct FfmpegRunner;

impl FfmpegRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self
    }

    /// Run an FFmpeg command to completion.
    ///
    /// Blocks until the external process exits; no internal timeout is
    /// imposed. On a non-zero exit the captured stderr is returned in the
    /// error so callers can surface the tool's own diagnostics.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let output = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some(String::from_utf8_lossy(&output.stderr).trim().to_string()),
                output.status.code(),
            ))
        }
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}
