//! Browser bindings.
//!
//! The host passes an optional measure callback. It receives
//! `{ cells: [{ widthPx, text }], hints: { fontSizePx, lineHeight, paddingPx } }`
//! and returns the row height in pixels, typically by rendering the cells
//! into an off-screen DOM node.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::font::FontMetrics;
use crate::measure::{MeasureError, MeasureRequest, Measurer, TextMeasurer};
use crate::model::{BusinessData, PrintTemplate};

/// Measures rows through a JavaScript function.
pub struct JsMeasurer {
    callback: js_sys::Function,
}

impl JsMeasurer {
    pub fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }
}

impl Measurer for JsMeasurer {
    fn measure(&mut self, request: &MeasureRequest) -> Result<f64, MeasureError> {
        let arg = request
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| MeasureError::Failed(e.to_string()))?;
        let height = self
            .callback
            .call1(&JsValue::NULL, &arg)
            .map_err(|e| MeasureError::Failed(format!("{:?}", e)))?;
        height
            .as_f64()
            .ok_or_else(|| MeasureError::Failed("measure callback must return a number".into()))
    }
}

/// Paginate a template. Returns an array of computed pages.
#[wasm_bindgen(js_name = computePages)]
pub fn compute_pages(
    template_json: &str,
    data_json: &str,
    measure: Option<js_sys::Function>,
) -> Result<JsValue, JsValue> {
    let to_js = |e: crate::LayoutError| JsValue::from_str(&e.to_string());

    let template: PrintTemplate =
        serde_json::from_str(template_json).map_err(|e| to_js(e.into()))?;
    let data: BusinessData = serde_json::from_str(data_json).map_err(|e| to_js(e.into()))?;

    let pages = match measure {
        Some(callback) => crate::compute_pages(&template, &data, &mut JsMeasurer::new(callback)),
        None => {
            let metrics = FontMetrics::from_entries(&template.fonts).map_err(to_js)?;
            crate::compute_pages(&template, &data, &mut TextMeasurer::new(metrics))
        }
    }
    .map_err(to_js)?;

    pages
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Failed to convert pages: {}", e)))
}
