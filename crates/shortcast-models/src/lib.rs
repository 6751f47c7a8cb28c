//! Shared data models for the shortcast pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Timed words and caption cues (SRT interchange)
//! - Encoder configurations and the fallback chain
//! - Content units and their publish lifecycle

pub mod caption;
pub mod content;
pub mod encoding;
pub mod timestamp;

// Re-export common types
pub use caption::{CaptionCue, CaptionTrack, SrtParseError, TimedWord, TranscriptSegment};
pub use content::{ContentUnit, PublishRunResult};
pub use encoding::{encoder_priority, EncoderConfig};
pub use timestamp::{format_subtitle_clock, parse_subtitle_clock, TimestampError};
