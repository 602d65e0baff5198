//! Millimetre / pixel conversion.
//!
//! Templates are authored in millimetres; heights are budgeted in CSS pixels
//! at the fixed 96 DPI the rendering surface uses.

/// Pixels per inch of the rendering surface.
pub const DPI: f64 = 96.0;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

pub fn mm_to_px(mm: f64) -> f64 {
    mm * DPI / MM_PER_INCH
}

pub fn px_to_mm(px: f64) -> f64 {
    px * MM_PER_INCH / DPI
}
