//! Row height resolution.
//!
//! `fixed` rows are exactly their declared height. `auto` rows are measured
//! with the row's bound text, and the declared height acts as a floor.

use serde_json::Value;

use crate::binding::{lookup_field, value_to_string};
use crate::measure::{CellText, MeasureRequest, Measurer, StyleHints};
use crate::model::{HeightMode, TableCell, TableRow};
use crate::units::mm_to_px;

/// Resolves row heights in pixels, borrowing the measurer for the run.
pub struct RowHeightResolver<'m> {
    measurer: &'m mut dyn Measurer,
    hints: StyleHints,
}

impl<'m> RowHeightResolver<'m> {
    pub fn new(measurer: &'m mut dyn Measurer, hints: StyleHints) -> Self {
        Self { measurer, hints }
    }

    /// Effective height of `row` bound to `data`, in pixels.
    pub fn resolve(&mut self, row: &TableRow, data: &Value) -> f64 {
        let declared = mm_to_px(row.height);
        if row.height_mode == HeightMode::Fixed {
            return declared;
        }

        let request = MeasureRequest {
            cells: cell_texts(row, data),
            hints: self.hints.with_style(row_style(row)),
        };
        match self.measurer.measure(&request) {
            Ok(measured) if measured.is_finite() => measured.max(declared),
            Ok(measured) => {
                log::debug!(
                    "Measurer returned {}, using declared row height {:.2}px",
                    measured,
                    declared
                );
                declared
            }
            Err(e) => {
                log::debug!("{}, using declared row height {:.2}px", e, declared);
                declared
            }
        }
    }

    /// Summed height of a block of rows (header or footer) bound to `data`.
    pub fn resolve_block(&mut self, rows: &[TableRow], data: &Value) -> f64 {
        rows.iter().map(|row| self.resolve(row, data)).sum()
    }
}

/// Text and pixel width of every cell of `row` bound to `data`.
pub fn cell_texts(row: &TableRow, data: &Value) -> Vec<CellText> {
    row.cells
        .iter()
        .map(|cell| CellText {
            width_px: mm_to_px(cell.width),
            text: cell_text(cell, data),
        })
        .collect()
}

/// Concatenated text of a cell's content elements. A data key binds against
/// the row's item; elements without one contribute their literal text.
pub fn cell_text(cell: &TableCell, data: &Value) -> String {
    let mut text = String::new();
    for el in &cell.content {
        match &el.data_key {
            Some(key) => {
                if let Some(v) = lookup_field(data, key) {
                    text.push_str(&value_to_string(v));
                }
            }
            None => {
                if let Some(literal) = el.literal_text() {
                    text.push_str(literal);
                }
            }
        }
    }
    text
}

/// Style bag of the first styled element in the row.
fn row_style(row: &TableRow) -> Option<&crate::model::StyleMap> {
    row.cells
        .iter()
        .flat_map(|cell| cell.content.iter())
        .find_map(|el| el.style.as_ref())
}
