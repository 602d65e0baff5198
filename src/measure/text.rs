//! Built-in text measurer.
//!
//! Counts wrapped lines per cell with a greedy UAX#14 line breaker and turns
//! the tallest cell into a row height. Words wider than the cell are broken
//! between characters, which is how the browser renders CJK text and
//! `word-break: break-all` cells.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use super::{MeasureError, MeasureRequest, Measurer};
use crate::font::FontMetrics;

/// A measurer backed by font metrics rather than a rendering surface.
#[derive(Debug, Clone, Default)]
pub struct TextMeasurer {
    metrics: FontMetrics,
    /// Per-character advances of the cell being measured, reused across rows.
    scratch: Vec<f64>,
}

impl TextMeasurer {
    pub fn new(metrics: FontMetrics) -> Self {
        Self {
            metrics,
            scratch: Vec::new(),
        }
    }

    /// Number of lines `text` wraps to within `max_width` pixels.
    pub fn count_lines(&mut self, text: &str, max_width: f64, font_size: f64) -> usize {
        if text.is_empty() {
            return 1;
        }

        let chars: Vec<char> = text.chars().collect();
        self.scratch.clear();
        self.scratch
            .extend(chars.iter().map(|&ch| self.metrics.char_width(ch, font_size)));
        let widths = &self.scratch;
        let break_opps = break_opportunities(text);

        let mut lines = 1;
        let mut line_start = 0;
        let mut line_width = 0.0;
        // Index of the first char of the next line if we break at the last
        // allowed opportunity.
        let mut last_break_point: Option<usize> = None;

        for (i, &width) in widths.iter().enumerate() {
            match break_opps[i] {
                Some(BreakOpportunity::Mandatory) => {
                    lines += 1;
                    line_start = i;
                    line_width = 0.0;
                    last_break_point = None;
                }
                Some(BreakOpportunity::Allowed) => {
                    last_break_point = Some(i);
                }
                None => {}
            }

            if line_width + width > max_width && line_start < i {
                lines += 1;
                match last_break_point {
                    Some(bp) if bp > line_start => {
                        line_start = bp;
                        line_width = widths[bp..i].iter().sum();
                    }
                    _ => {
                        line_start = i;
                        line_width = 0.0;
                    }
                }
                last_break_point = None;
            }

            line_width += width;
        }

        lines
    }
}

impl Measurer for TextMeasurer {
    fn measure(&mut self, request: &MeasureRequest) -> Result<f64, MeasureError> {
        let hints = request.hints;
        let line_px = hints.font_size_px * hints.line_height;
        let mut tallest: f64 = 0.0;

        for cell in &request.cells {
            let inner_width = cell.width_px - 2.0 * hints.padding_px;
            let lines = self.count_lines(&cell.text, inner_width, hints.font_size_px);
            let height = lines as f64 * line_px + 2.0 * hints.padding_px;
            tallest = tallest.max(height);
        }

        if !tallest.is_finite() {
            return Err(MeasureError::Failed(format!(
                "non-finite row height {}",
                tallest
            )));
        }
        Ok(tallest)
    }
}

/// UAX#14 opportunity before each char of `text`, one slot per char.
/// Slot 0 never breaks; the trailing end-of-text break has no slot.
fn break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let mut breaks = linebreaks(text).peekable();
    text.char_indices()
        .map(|(byte, _)| {
            while breaks.next_if(|&(at, _)| at < byte).is_some() {}
            match breaks.peek() {
                Some(&(at, opp)) if at == byte && byte > 0 => Some(opp),
                _ => None,
            }
        })
        .collect()
}
