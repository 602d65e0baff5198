//! # Font Metrics
//!
//! Character advance widths for the built-in text measurer.
//!
//! Without a font the measurer uses approximate metrics: half-width glyphs
//! for Latin text, full-width glyphs for CJK. When the template embeds a
//! TrueType/OpenType font its real advances are read with ttf-parser.

use std::collections::HashMap;

use crate::error::LayoutError;
use crate::model::FontEntry;

/// Advance width of a narrow glyph, as a fraction of the em.
const NARROW_ADVANCE: f64 = 0.55;

/// Source of per-character advance widths.
#[derive(Debug, Clone, Default)]
pub enum FontMetrics {
    /// Fixed advances by character class.
    #[default]
    Approximate,
    /// Advances parsed from font data.
    Custom(CustomFontMetrics),
}

impl FontMetrics {
    /// Build metrics from the first template font, or approximate metrics
    /// when the template has none.
    pub fn from_entries(entries: &[FontEntry]) -> Result<Self, LayoutError> {
        let Some(entry) = entries.first() else {
            return Ok(FontMetrics::Approximate);
        };
        let data = decode_font_source(&entry.src)
            .map_err(|e| LayoutError::Font(format!("font '{}': {}", entry.family, e)))?;
        let metrics = CustomFontMetrics::from_font_data(&data).ok_or_else(|| {
            LayoutError::Font(format!(
                "font '{}' is not a valid TrueType/OpenType font",
                entry.family
            ))
        })?;
        log::debug!(
            "Loaded font '{}' ({} glyph advances)",
            entry.family,
            metrics.advance_widths.len()
        );
        Ok(FontMetrics::Custom(metrics))
    }

    /// Parse metrics from raw font bytes.
    pub fn from_font_data(data: &[u8]) -> Result<Self, LayoutError> {
        CustomFontMetrics::from_font_data(data)
            .map(FontMetrics::Custom)
            .ok_or_else(|| LayoutError::Font("not a valid TrueType/OpenType font".to_string()))
    }

    /// Advance width of a character in pixels at `font_size` px.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        if ch.is_control() {
            return 0.0;
        }
        match self {
            FontMetrics::Approximate => {
                if is_wide(ch) {
                    font_size
                } else {
                    font_size * NARROW_ADVANCE
                }
            }
            FontMetrics::Custom(m) => m.char_width(ch, font_size),
        }
    }
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
}

impl CustomFontMetrics {
    /// Get the advance width of a character at `font_size`.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Read advances for every character the font's Unicode cmap maps.
    /// The space advance stands in for unmapped characters.
    pub fn from_font_data(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let cmap = face.tables().cmap?;

        let mut advance_widths = HashMap::new();
        for subtable in cmap.subtables.into_iter().filter(|t| t.is_unicode()) {
            subtable.codepoints(|code| {
                let advance = subtable
                    .glyph_index(code)
                    .and_then(|glyph| face.glyph_hor_advance(glyph));
                if let (Some(ch), Some(advance)) = (char::from_u32(code), advance) {
                    advance_widths.entry(ch).or_insert(advance);
                }
            });
        }

        let units_per_em = face.units_per_em();
        let default_advance = advance_widths
            .get(&' ')
            .copied()
            .filter(|a| *a > 0)
            .unwrap_or(units_per_em / 2);

        Some(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
        })
    }
}

/// Whether a character renders at full (double) width.
pub fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x2FFFD
        | 0x30000..=0x3FFFD)
}

/// Resolve a font `src` to raw bytes.
///
/// Supported formats:
/// - `data:font/...;base64,...` data URI
/// - Raw base64-encoded font data
fn decode_font_source(src: &str) -> Result<Vec<u8>, String> {
    let b64_data = if src.starts_with("data:") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| "Invalid data URI: missing comma".to_string())?;
        &src[comma_pos + 1..]
    } else {
        src
    };
    base64_decode(b64_data.trim())
}

fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input)
        .map_err(|e| format!("Base64 decode error: {}", e))
}
