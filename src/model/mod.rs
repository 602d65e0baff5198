//! # Template Model
//!
//! The input representation for the pagination engine. A template is a paper
//! configuration plus a flat list of absolutely positioned elements, exactly
//! as the drag-and-drop designer saves it. All geometry is in millimetres.
//!
//! Elements are a closed set of kinds discriminated by the JSON `"type"`
//! field. At most one element may be a table; its presence is what makes a
//! template paginate.

pub mod table;
mod validate;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use table::*;

/// The business data object a template is bound against.
pub type BusinessData = Map<String, Value>;

/// Free-form style bag carried through to the renderer.
pub type StyleMap = Map<String, Value>;

/// A complete print template ready for pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintTemplate {
    pub paper: PaperConfig,

    #[serde(default)]
    pub elements: Vec<PrintElement>,

    /// Whether elements above the table repeat on every page.
    #[serde(default)]
    pub header_display: HeaderDisplay,

    /// Whether elements below the table repeat on every page.
    #[serde(default)]
    pub footer_display: FooterDisplay,

    /// Fonts available to the built-in text measurer. Each entry holds
    /// base64-encoded font data or a data URI.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fonts: Vec<FontEntry>,
}

impl PrintTemplate {
    /// The single table element, if the template has one.
    pub fn table(&self) -> Option<(&PrintElement, &TableSpec)> {
        self.elements
            .iter()
            .find_map(|el| el.as_table().map(|table| (el, table)))
    }
}

/// A custom font to register with the built-in measurer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontEntry {
    pub family: String,
    pub src: String,
}

/// Physical page geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperConfig {
    /// Page width in mm, already oriented.
    pub width: f64,
    /// Page height in mm, already oriented.
    pub height: f64,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub margins: Margins,
}

impl PaperConfig {
    /// A4 portrait with uniform 10mm margins.
    pub fn a4() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            orientation: Orientation::Portrait,
            margins: Margins::uniform(10.0),
        }
    }

    /// Height between the top and bottom margins, in mm.
    pub fn inner_height(&self) -> f64 {
        self.height - self.margins.vertical()
    }

    /// Width between the left and right margins, in mm.
    pub fn inner_width(&self) -> f64 {
        self.width - self.margins.horizontal()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in mm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Display policy for elements positioned above the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderDisplay {
    #[default]
    #[serde(alias = "all")]
    PerPage,
    #[serde(alias = "first")]
    FirstPageOnly,
}

/// Display policy for elements positioned below the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FooterDisplay {
    #[default]
    #[serde(alias = "all")]
    PerPage,
    #[serde(alias = "last")]
    LastPageOnly,
}

/// A positioned visual unit on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintElement {
    pub id: String,

    /// What kind of element this is, plus its kind-specific fields.
    #[serde(flatten)]
    pub kind: ElementKind,

    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,

    /// Key into the bound data object (or the row item, inside table cells).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,
}

/// The closed set of element kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ElementKind {
    Text {
        /// Fixed text content, used when no data key is bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<TextFormat>,
    },
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
    },
    Qrcode {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Barcode {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Line {
        x2: f64,
        y2: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line_style: Option<StrokeStyle>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line_width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line_color: Option<String>,
    },
    Rect {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        border_style: Option<StrokeStyle>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        border_width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        border_color: Option<String>,
    },
    Table(Box<TableSpec>),
    PageInfo {
        /// e.g. `"Page {pageNumber} of {totalPages}"`
        format: String,
        /// The format with placeholders filled in, set on computed pages.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextFormat {
    Plain,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeStyle {
    Solid,
    Dashed,
}

impl PrintElement {
    /// Create a text element with fixed content.
    pub fn text(id: &str, content: &str) -> Self {
        Self::new(
            id,
            ElementKind::Text {
                content: Some(content.to_string()),
                format: None,
            },
        )
    }

    /// Create a text element bound to a data key.
    pub fn bound_text(id: &str, data_key: &str) -> Self {
        let mut el = Self::new(
            id,
            ElementKind::Text {
                content: None,
                format: None,
            },
        );
        el.data_key = Some(data_key.to_string());
        el
    }

    /// Create a table element.
    pub fn table(id: &str, spec: TableSpec) -> Self {
        Self::new(id, ElementKind::Table(Box::new(spec)))
    }

    /// Create a page-info element.
    pub fn page_info(id: &str, format: &str) -> Self {
        Self::new(
            id,
            ElementKind::PageInfo {
                format: format.to_string(),
                text: None,
            },
        )
    }

    fn new(id: &str, kind: ElementKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            data_key: None,
            style: None,
        }
    }

    /// Builder-style position setter (mm).
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Builder-style size setter (mm).
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn as_table(&self) -> Option<&TableSpec> {
        match &self.kind {
            ElementKind::Table(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self.kind, ElementKind::Table(_))
    }

    pub fn is_page_info(&self) -> bool {
        matches!(self.kind, ElementKind::PageInfo { .. })
    }

    /// The literal text an element contributes when it has no data binding.
    pub fn literal_text(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text { content, .. } => content.as_deref(),
            ElementKind::Qrcode { value } | ElementKind::Barcode { value } => value.as_deref(),
            ElementKind::PageInfo { format, .. } => Some(format),
            _ => None,
        }
    }

    /// Human-readable kind name, used in validation messages.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ElementKind::Text { .. } => "text",
            ElementKind::Image { .. } => "image",
            ElementKind::Qrcode { .. } => "qrcode",
            ElementKind::Barcode { .. } => "barcode",
            ElementKind::Line { .. } => "line",
            ElementKind::Rect { .. } => "rect",
            ElementKind::Table(_) => "table",
            ElementKind::PageInfo { .. } => "pageInfo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn element_kind_is_tagged_by_type() {
        let el: PrintElement = serde_json::from_value(json!({
            "id": "title",
            "type": "text",
            "x": 10, "y": 5, "width": 100, "height": 8,
            "content": "Delivery note"
        }))
        .unwrap();
        assert_eq!(el.kind_name(), "text");
        assert_eq!(el.literal_text(), Some("Delivery note"));
        assert_eq!(el.y, 5.0);
    }

    #[test]
    fn line_fields_are_camel_case() {
        let el: PrintElement = serde_json::from_value(json!({
            "id": "rule", "type": "line",
            "x": 0, "y": 40, "width": 190, "height": 0,
            "x2": 190, "y2": 40, "lineStyle": "dashed", "lineWidth": 0.5
        }))
        .unwrap();
        match el.kind {
            ElementKind::Line {
                line_style,
                line_width,
                ..
            } => {
                assert_eq!(line_style, Some(StrokeStyle::Dashed));
                assert_eq!(line_width, Some(0.5));
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn display_policies_accept_short_aliases() {
        let t: PrintTemplate = serde_json::from_value(json!({
            "paper": { "width": 210, "height": 297 },
            "elements": [],
            "headerDisplay": "first",
            "footerDisplay": "lastPageOnly"
        }))
        .unwrap();
        assert_eq!(t.header_display, HeaderDisplay::FirstPageOnly);
        assert_eq!(t.footer_display, FooterDisplay::LastPageOnly);
        assert_eq!(t.paper.orientation, Orientation::Portrait);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = serde_json::from_value::<PrintElement>(json!({
            "id": "x", "type": "chart", "x": 0, "y": 0, "width": 1, "height": 1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn inner_height_subtracts_margins() {
        let paper = PaperConfig::a4();
        assert_eq!(paper.inner_height(), 277.0);
        assert_eq!(paper.inner_width(), 190.0);
    }
}
