//! Table element specification: header/footer blocks, the body row template,
//! and the pagination knobs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::PrintElement;

/// The kind-specific part of a `table` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<TableHeader>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<TableFooter>,

    pub body: TableBody,

    /// When set and positive, paginate by row count instead of height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_per_page: Option<usize>,

    /// Pad the trailing page to a full `rows_per_page` with blank rows.
    #[serde(default)]
    pub auto_fill_blank: bool,

    #[serde(default = "default_columns")]
    pub columns_count: usize,

    /// Field name used to cluster data items before chunking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
}

/// Upper bound on `rowsPerPage * columnsCount`, the cell slots of one page.
pub const MAX_SLOTS_PER_PAGE: usize = 10_000;

fn default_columns() -> usize {
    1
}

impl TableSpec {
    /// A single-column, height-paginated table over `data_key`.
    pub fn new(data_key: &str, row_template: TableRow) -> Self {
        Self {
            header: None,
            footer: None,
            body: TableBody {
                data_key: Some(data_key.to_string()),
                layout: DataFlow::default(),
                row_template,
                group_row_template: None,
            },
            rows_per_page: None,
            auto_fill_blank: false,
            columns_count: 1,
            group_by: None,
        }
    }

    /// `rows_per_page` when fixed-count pagination applies.
    pub fn fixed_rows_per_page(&self) -> Option<usize> {
        self.rows_per_page.filter(|&r| r > 0)
    }

    pub fn header_rows(&self) -> &[TableRow] {
        self.header.as_ref().map_or(&[], |h| h.rows.as_slice())
    }

    pub fn footer_rows(&self) -> &[TableRow] {
        self.footer.as_ref().map_or(&[], |f| f.rows.as_slice())
    }

    /// Every row definition in the table: header, footer, body and group rows.
    pub fn all_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.header_rows()
            .iter()
            .chain(self.footer_rows())
            .chain(std::iter::once(&self.body.row_template))
            .chain(self.body.group_row_template.as_ref())
    }
}

/// Header block and its repeat policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableHeader {
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub repeat: HeaderRepeat,
}

/// Footer block with repeat and position policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFooter {
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub repeat: FooterRepeat,
    #[serde(default)]
    pub position: FooterPosition,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderRepeat {
    #[default]
    All,
    First,
    None,
}

impl HeaderRepeat {
    /// Whether header rows are drawn (and budgeted) on the given page.
    pub fn shows_on(self, is_first_page: bool) -> bool {
        match self {
            HeaderRepeat::All => true,
            HeaderRepeat::First => is_first_page,
            HeaderRepeat::None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FooterRepeat {
    #[default]
    All,
    Last,
    None,
}

impl FooterRepeat {
    pub fn shows_on(self, is_last_page: bool) -> bool {
        match self {
            FooterRepeat::All => true,
            FooterRepeat::Last => is_last_page,
            FooterRepeat::None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FooterPosition {
    /// Footer space is reserved on every page.
    #[default]
    Fixed,
    /// Footer follows the last row without a reservation.
    Follow,
}

/// Body specification: which data array to iterate and how to lay it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_key: Option<String>,
    #[serde(default)]
    pub layout: DataFlow,
    pub row_template: TableRow,
    /// Row template used for group marker rows instead of `row_template`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_row_template: Option<TableRow>,
}

/// Cell ordering for multi-column tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataFlow {
    /// Fill across, then down.
    #[default]
    #[serde(rename = "ltr-ttb")]
    RowMajor,
    /// Fill down each column, then move to the next.
    #[serde(rename = "ttb-ltr")]
    ColumnMajor,
}

/// A header, footer or body-template row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// Height in mm. A floor for `auto` rows, exact for `fixed` ones.
    pub height: f64,
    #[serde(default)]
    pub height_mode: HeightMode,
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn fixed(height: f64, cells: Vec<TableCell>) -> Self {
        Self {
            height,
            height_mode: HeightMode::Fixed,
            cells,
        }
    }

    pub fn auto(min_height: f64, cells: Vec<TableCell>) -> Self {
        Self {
            height: min_height,
            height_mode: HeightMode::Auto,
            cells,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeightMode {
    #[default]
    Fixed,
    Auto,
}

/// A cell of a table row. Its content elements supply the cell's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    /// Width in mm.
    pub width: f64,
    #[serde(default = "default_span")]
    pub col_span: u32,
    #[serde(default = "default_span")]
    pub row_span: u32,
    #[serde(default)]
    pub content: Vec<PrintElement>,
}

fn default_span() -> u32 {
    1
}

impl TableCell {
    pub fn new(width: f64, content: Vec<PrintElement>) -> Self {
        Self {
            width,
            col_span: 1,
            row_span: 1,
            content,
        }
    }
}

/// One cell slot of a paginated table row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowItem {
    /// A real data item and its index in the source array.
    Data { index: usize, value: Value },
    /// A synthetic group header produced by the grouping stage.
    Group { name: String },
    /// Padding with no backing data.
    Blank,
}

impl RowItem {
    pub fn is_blank(&self) -> bool {
        matches!(self, RowItem::Blank)
    }

    pub fn is_group(&self) -> bool {
        matches!(self, RowItem::Group { .. })
    }

    /// Index into the source data array, for data items only.
    pub fn data_index(&self) -> Option<usize> {
        match self {
            RowItem::Data { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The JSON a cell binds against.
    pub fn to_value(&self) -> Value {
        match self {
            RowItem::Data { value, .. } => value.clone(),
            RowItem::Group { name } => json!({ "isGroup": true, "groupName": name }),
            RowItem::Blank => json!({ "isBlank": true }),
        }
    }
}

impl Serialize for RowItem {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowItem::Data { value, .. } => value.serialize(serializer),
            other => other.to_value().serialize(serializer),
        }
    }
}

/// A paginated table row: exactly `columns_count` cell slots.
pub type PageRow = Vec<RowItem>;
