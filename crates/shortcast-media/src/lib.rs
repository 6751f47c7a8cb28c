//! FFmpeg CLI wrapper for the shortcast pipeline.
//!
//! Everything here shells out to external tools (`ffmpeg`, `ffprobe`,
//! `whisper`) and never links codec libraries. The crate owns:
//! - the FFmpeg command builder and runner with captured diagnostics
//! - the caption burn-in / trim / mix filter graph
//! - the hardware-to-software encoder fallback runner
//! - the stream-copy segmenter
//! - the narration duration probe
//! - the transcription collaborator seam

pub mod command;
pub mod encode;
pub mod error;
pub mod filters;
pub mod probe;
pub mod segment;
pub mod transcript;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use encode::{encode_with_fallback, EncodeBackend, EncodeSources, FfmpegEncodeBackend};
pub use error::{MediaError, MediaResult};
pub use filters::{compose_filter_graph, CaptionStyle, AMBIENT_VOLUME};
pub use probe::{get_duration, probe_media, MediaInfo};
pub use segment::{part_file_name, split_into_parts};
pub use transcript::{Transcriber, WhisperCli};
