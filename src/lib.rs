//! # Pagewright
//!
//! A pagination engine for designer-built print templates.
//!
//! A template is a page of absolutely positioned elements (text, images,
//! barcodes, lines) drawn in a visual designer, with at most one data table
//! bound to an array in the business data. The table is the only thing that
//! grows: a 3-line invoice fits one page, a 300-line one needs many. This
//! crate decides where the table breaks, which header and footer companions
//! appear on each page, and what every page's data looks like. Painting the
//! result is left to whatever renderer consumes the pages.
//!
//! ## Architecture
//!
//! ```text
//! Input (template JSON + data JSON)
//!       ↓
//!   [model]    — Template, elements, table spec, validation
//!       ↓
//!   [measure]  — Row heights for auto rows (text wrap or a host callback)
//!       ↓
//!   [layout]   — Grouping, pagination, per-page element selection
//!       ↓
//!   Vec<ComputedPage>
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod measure;
pub mod model;
pub mod units;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::LayoutConfig;
pub use error::LayoutError;
pub use layout::{ComputedPage, LayoutEngine, TableSlice};
pub use measure::{MeasureError, MeasureRequest, Measurer, TextMeasurer, Unmeasured};
pub use model::{BusinessData, PrintTemplate};

use font::FontMetrics;

/// Paginate a template against its data.
///
/// This is the primary entry point. `measurer` sizes rows whose height mode
/// is `auto`; pass [`Unmeasured`] to treat every row as its declared height.
pub fn compute_pages(
    template: &PrintTemplate,
    data: &BusinessData,
    measurer: &mut dyn Measurer,
) -> Result<Vec<ComputedPage>, LayoutError> {
    Ok(LayoutEngine::new(template, data)?.compute_pages(measurer))
}

/// Paginate a template and data given as JSON.
///
/// Auto rows are measured by wrapping their text with the template's first
/// embedded font, or approximate metrics when it has none.
pub fn compute_pages_json(
    template_json: &str,
    data_json: &str,
) -> Result<Vec<ComputedPage>, LayoutError> {
    let template: PrintTemplate = serde_json::from_str(template_json)?;
    let data: BusinessData = serde_json::from_str(data_json)?;
    let mut measurer = TextMeasurer::new(FontMetrics::from_entries(&template.fonts)?);
    compute_pages(&template, &data, &mut measurer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"{
        "paper": { "width": 210, "height": 297, "margins": { "top": 10, "right": 10, "bottom": 10, "left": 10 } },
        "elements": [
            { "id": "title", "type": "text", "content": "Packing list", "x": 10, "y": 10, "width": 100, "height": 8 },
            { "id": "rows", "type": "table", "x": 10, "y": 20, "width": 190, "height": 100,
              "rowsPerPage": 2,
              "body": { "dataKey": "items", "rowTemplate": { "height": 8, "cells": [
                  { "width": 190, "content": [ { "id": "c", "type": "text", "dataKey": "name" } ] }
              ] } } }
        ]
    }"#;

    #[test]
    fn json_entry_point() {
        let pages =
            compute_pages_json(TEMPLATE, r#"{"items": [{"name": "a"}, {"name": "b"}, {"name": "c"}]}"#)
                .unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].page_data["__table_rows_data"][0][0]["name"], "c");
    }

    #[test]
    fn malformed_data_is_a_parse_error() {
        let err = compute_pages_json(TEMPLATE, "[1, 2").unwrap_err();
        assert!(matches!(err, LayoutError::Parse { .. }));
    }

    #[test]
    fn data_must_be_an_object() {
        assert!(compute_pages_json(TEMPLATE, "[]").is_err());
    }
}
