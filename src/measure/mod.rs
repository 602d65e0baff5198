//! # Row Measurement
//!
//! The engine never shapes text itself. Rows whose height mode is `auto` are
//! measured through a [`Measurer`]: given each cell's width and text, it
//! returns the rendered row height in pixels.
//!
//! A measurer owns whatever surface it measures on (an off-screen DOM node,
//! a font face, a scratch buffer). `measure` takes `&mut self`, so the
//! surface is held exclusively for one row at a time and reused serially.
//!
//! Any failure, including "no surface in this environment", is reported as
//! a [`MeasureError`]; the row height resolver then falls back to the row's
//! declared height.

pub mod text;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::StyleMap;

pub use text::TextMeasurer;

/// Text and width of one cell, as handed to a measurer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellText {
    pub width_px: f64,
    pub text: String,
}

/// Typography hints for a measured row. All lengths in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleHints {
    pub font_size_px: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Padding applied inside each cell on every side.
    pub padding_px: f64,
}

impl Default for StyleHints {
    fn default() -> Self {
        Self {
            font_size_px: 12.0,
            line_height: 1.2,
            padding_px: 2.0,
        }
    }
}

impl StyleHints {
    /// Override these hints with `fontSize`, `lineHeight` and `padding` from
    /// an element's style bag. Non-numeric or non-positive values are ignored.
    pub fn with_style(mut self, style: Option<&StyleMap>) -> Self {
        let Some(style) = style else {
            return self;
        };
        if let Some(v) = positive_number(style.get("fontSize")) {
            self.font_size_px = v;
        }
        if let Some(v) = positive_number(style.get("lineHeight")) {
            self.line_height = v;
        }
        if let Some(v) = style.get("padding").and_then(Value::as_f64) {
            if v >= 0.0 {
                self.padding_px = v;
            }
        }
        self
    }
}

fn positive_number(v: Option<&Value>) -> Option<f64> {
    v.and_then(Value::as_f64).filter(|v| *v > 0.0)
}

/// A request to measure one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureRequest {
    pub cells: Vec<CellText>,
    pub hints: StyleHints,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeasureError {
    /// No measurement surface exists in this environment.
    #[error("measurement surface unavailable")]
    Unavailable,
    #[error("measurement failed: {0}")]
    Failed(String),
}

/// The measurement-service capability.
pub trait Measurer {
    /// Rendered height of the row in pixels.
    fn measure(&mut self, request: &MeasureRequest) -> Result<f64, MeasureError>;
}

impl<F> Measurer for F
where
    F: FnMut(&MeasureRequest) -> Result<f64, MeasureError>,
{
    fn measure(&mut self, request: &MeasureRequest) -> Result<f64, MeasureError> {
        self(request)
    }
}

/// A measurer for environments with no rendering surface. Every `auto` row
/// resolves to its declared height.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unmeasured;

impl Measurer for Unmeasured {
    fn measure(&mut self, _request: &MeasureRequest) -> Result<f64, MeasureError> {
        Err(MeasureError::Unavailable)
    }
}
