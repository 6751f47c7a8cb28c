//! Caption burn-in and audio mix filter graph.
//!
//! The graph is composed once per encode and handed unchanged to every
//! encoder configuration, so caption styling and mixing behavior do not
//! depend on which encoder finally produces the file.

use std::path::Path;

/// Ambient bed volume as a proportion of full scale. Low enough that the
/// bed never masks narration.
pub const AMBIENT_VOLUME: f64 = 0.2;

/// Burned-in caption styling. Fixed defaults, not user-configurable.
#[derive(Debug, Clone)]
pub struct CaptionStyle {
    /// Font family name
    pub font: String,
    /// Font size in ASS units
    pub font_size: u32,
    /// Text colour (ASS &HBBGGRR& form)
    pub primary_colour: String,
    /// Outline colour (ASS &HBBGGRR& form)
    pub outline_colour: String,
    /// Outline thickness
    pub outline: u32,
    /// Numpad-style alignment (5 = middle center)
    pub alignment: u32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            font_size: 18,
            primary_colour: "&HFFFFFF&".to_string(),
            outline_colour: "&H000000&".to_string(),
            outline: 2,
            alignment: 5,
        }
    }
}

impl CaptionStyle {
    /// Render as a libass `force_style` value.
    pub fn force_style(&self) -> String {
        format!(
            "FontName={},FontSize={},PrimaryColour={},OutlineColour={},Outline={},Alignment={}",
            self.font,
            self.font_size,
            self.primary_colour,
            self.outline_colour,
            self.outline,
            self.alignment
        )
    }
}

/// Escape a value for use inside an FFmpeg filtergraph.
///
/// Filtergraphs treat `:` and `,` as separators and `\` as an escape
/// character; quotes must also be escaped so paths stay literal.
fn escape_filter_value(raw: &str) -> String {
    raw.replace('\\', r"\\")
        .replace(':', r"\:")
        .replace(',', r"\,")
        .replace('\'', r"\'")
}

/// Compose the filter graph over the three input streams.
///
/// Stream order is fixed: input 0 is the background video, input 1 the
/// narration audio, input 2 the ambient audio. Three stages:
/// 1. burn captions into the video, then trim it to the narration length
/// 2. attenuate the ambient bed to [`AMBIENT_VOLUME`]
/// 3. mix narration and ambient, stopping at the shorter input
///
/// The labeled outputs are `[vout]` and `[aout]`.
pub fn compose_filter_graph(subtitle_path: &Path, duration: f64, style: &CaptionStyle) -> String {
    let subtitle = escape_filter_value(&subtitle_path.to_string_lossy());

    format!(
        "[0:v]subtitles='{}':force_style='{}',trim=duration={:.3},setpts=PTS-STARTPTS[vout];\
         [2:a]volume={}[ambient];\
         [1:a][ambient]amix=inputs=2:duration=shortest[aout]",
        subtitle,
        style.force_style(),
        duration,
        AMBIENT_VOLUME
    )
}
