//! Caption track construction and SRT interchange.
//!
//! Captions are built one cue per word so the burned-in text tracks the
//! narration word by word. The serialized form is standard SRT and must
//! stay re-parseable by any subtitle consumer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timestamp::{format_subtitle_clock, parse_subtitle_clock, TimestampError};

/// A single word with its spoken time range, as produced by the
/// transcription collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedWord {
    /// Literal word text
    pub text: String,
    /// Start of the word in seconds
    pub start: f64,
    /// End of the word in seconds (>= start)
    pub end: f64,
}

impl TimedWord {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// An ordered group of timed words, as emitted by the transcription
/// collaborator. Segment boundaries carry no meaning downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Words in spoken order
    pub words: Vec<TimedWord>,
}

impl TranscriptSegment {
    pub fn new(words: Vec<TimedWord>) -> Self {
        Self { words }
    }
}

/// A single subtitle cue in interchange form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionCue {
    /// 1-based cue index, gapless across the whole track
    pub index: u32,
    /// Start clock (`HH:MM:SS,mmm`)
    pub start: String,
    /// End clock (`HH:MM:SS,mmm`)
    pub end: String,
    /// Cue text, unmodified word text
    pub text: String,
}

/// An ordered caption cue list for one narration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptionTrack {
    pub cues: Vec<CaptionCue>,
}

impl CaptionTrack {
    /// Build a track from transcript segments, one cue per word.
    ///
    /// Segment structure is flattened: indexes start at 1 and keep
    /// incrementing across segment boundaries.
    pub fn from_segments(segments: &[TranscriptSegment]) -> Self {
        let mut cues = Vec::new();
        let mut index = 0u32;

        for segment in segments {
            for word in &segment.words {
                index += 1;
                cues.push(CaptionCue {
                    index,
                    start: format_subtitle_clock(word.start),
                    end: format_subtitle_clock(word.end),
                    text: word.text.clone(),
                });
            }
        }

        Self { cues }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Render the track as SRT: `index\nstart --> end\ntext\n\n` blocks,
    /// joined with no extra separators.
    pub fn to_srt(&self) -> String {
        let mut out = String::new();
        for cue in &self.cues {
            out.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                cue.index, cue.start, cue.end, cue.text
            ));
        }
        out
    }

    /// Parse SRT text back into a track.
    ///
    /// Accepts multi-line cue text (joined with `\n`), which the builder
    /// never emits but the interchange format allows.
    pub fn parse_srt(input: &str) -> Result<Self, SrtParseError> {
        let mut cues = Vec::new();

        for block in input.split("\n\n") {
            let block = block.trim();
            if block.is_empty() {
                continue;
            }

            let mut lines = block.lines();
            let index_line = lines.next().unwrap_or_default();
            let index: u32 = index_line
                .trim()
                .parse()
                .map_err(|_| SrtParseError::InvalidIndex(index_line.to_string()))?;

            let range_line = lines
                .next()
                .ok_or_else(|| SrtParseError::MissingTimeRange(index))?;
            let (start, end) = range_line
                .split_once(" --> ")
                .ok_or_else(|| SrtParseError::InvalidTimeRange(range_line.to_string()))?;

            // Validate both clocks even though the strings are kept verbatim
            parse_subtitle_clock(start)?;
            parse_subtitle_clock(end)?;

            let text = lines.collect::<Vec<_>>().join("\n");

            cues.push(CaptionCue {
                index,
                start: start.trim().to_string(),
                end: end.trim().to_string(),
                text,
            });
        }

        Ok(Self { cues })
    }
}

/// SRT parsing error.
#[derive(Debug, Error)]
pub enum SrtParseError {
    #[error("Invalid cue index: {0}")]
    InvalidIndex(String),

    #[error("Cue {0} is missing its time range line")]
    MissingTimeRange(u32),

    #[error("Invalid time range line: {0}")]
    InvalidTimeRange(String),

    #[error("Invalid clock value: {0}")]
    Timestamp(#[from] TimestampError),
}
