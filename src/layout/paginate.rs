//! # Table Pagination
//!
//! Splits the row stream of a table into pages. Two strategies:
//!
//! - **Fixed row count**: chunked rows are cut into pages of `rows_per_page`,
//!   optionally padding the trailing page with blank rows. No measuring.
//! - **Height bounded**: rows are pulled one at a time and accepted while
//!   they fit the page's remaining height. The first row of a page is always
//!   accepted, so every page makes progress even when a row is taller than
//!   the page.

use serde_json::Value;

use super::chunk::chunk_rows;
use super::rows::RowHeightResolver;
use crate::model::{HeaderRepeat, PageRow, RowItem, TableRow, TableSpec};

/// The rows of every page of a table, in order.
pub type TablePages = Vec<Vec<PageRow>>;

/// Fixed-count pagination.
pub fn paginate_fixed(items: Vec<RowItem>, spec: &TableSpec, rows_per_page: usize) -> TablePages {
    let columns = spec.columns_count.max(1);
    let rows = chunk_rows(items, columns, spec.body.layout, rows_per_page);

    let mut pages: TablePages = Vec::with_capacity(rows.len().div_ceil(rows_per_page).max(1));
    let mut iter = rows.into_iter().peekable();
    while iter.peek().is_some() {
        pages.push(iter.by_ref().take(rows_per_page).collect());
    }
    if pages.is_empty() {
        pages.push(Vec::new());
    }

    if spec.auto_fill_blank {
        if let Some(last) = pages.last_mut() {
            let fill = rows_per_page.saturating_sub(last.len());
            last.extend((0..fill).map(|_| vec![RowItem::Blank; columns]));
        }
    }
    pages
}

/// Vertical budget of a height-bounded table, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightBudget {
    /// Page height between the top and bottom margins.
    pub page_inner_px: f64,
    /// Where the table starts on the first page.
    pub first_page_start_px: f64,
    /// Footer height held back on every page.
    pub footer_reserve_px: f64,
    /// Height of the header block.
    pub header_px: f64,
    pub header_repeat: HeaderRepeat,
}

impl HeightBudget {
    /// Height available to header and body rows on the given page.
    pub fn available(&self, page_index: usize) -> f64 {
        let start = if page_index == 0 {
            self.first_page_start_px
        } else {
            0.0
        };
        self.page_inner_px - start - self.footer_reserve_px
    }

    /// Header height counted against the given page.
    pub fn header_on(&self, page_index: usize) -> f64 {
        if self.header_repeat.shows_on(page_index == 0) {
            self.header_px
        } else {
            0.0
        }
    }
}

/// Where the page loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FillState {
    Accumulating,
    PageFull,
    Done,
}

/// Tracks the page being filled.
struct PageFill {
    rows: Vec<PageRow>,
    used_px: f64,
    available_px: f64,
}

impl PageFill {
    fn open(budget: &HeightBudget, page_index: usize) -> Self {
        Self {
            rows: Vec::new(),
            used_px: budget.header_on(page_index),
            available_px: budget.available(page_index),
        }
    }

    /// Whether a row of `height` may be placed. An empty page takes any row.
    fn accepts(&self, height: f64) -> bool {
        self.rows.is_empty() || self.used_px + height <= self.available_px
    }

    fn place(&mut self, item: RowItem, height: f64) {
        self.used_px += height;
        self.rows.push(vec![item]);
    }
}

/// Height-bounded pagination. One item per row.
pub fn paginate_by_height(
    items: Vec<RowItem>,
    spec: &TableSpec,
    budget: &HeightBudget,
    resolver: &mut RowHeightResolver<'_>,
) -> TablePages {
    let mut pages: TablePages = Vec::new();
    let mut cursor = items.into_iter();
    // A row deferred from the previous page, with its already resolved height.
    let mut pending: Option<(RowItem, f64)> = None;
    let mut page = PageFill::open(budget, 0);
    let mut state = FillState::Accumulating;

    while state != FillState::Done {
        match state {
            FillState::Accumulating => {
                let next = pending.take().or_else(|| {
                    cursor.next().map(|item| {
                        let height = resolve_item(resolver, spec, &item);
                        (item, height)
                    })
                });
                match next {
                    Some((item, height)) if page.accepts(height) => {
                        log::trace!(
                            "Page {}: row {:.2}px placed at {:.2}/{:.2}px",
                            pages.len() + 1,
                            height,
                            page.used_px,
                            page.available_px
                        );
                        page.place(item, height);
                    }
                    Some(deferred) => {
                        log::trace!(
                            "Page {}: row {:.2}px deferred at {:.2}/{:.2}px",
                            pages.len() + 1,
                            deferred.1,
                            page.used_px,
                            page.available_px
                        );
                        pending = Some(deferred);
                        state = FillState::PageFull;
                    }
                    None => {
                        pages.push(std::mem::take(&mut page.rows));
                        state = FillState::Done;
                    }
                }
            }
            FillState::PageFull => {
                log::debug!(
                    "Page {} full with {} rows ({:.2}px of {:.2}px)",
                    pages.len() + 1,
                    page.rows.len(),
                    page.used_px,
                    page.available_px
                );
                pages.push(std::mem::take(&mut page.rows));
                page = PageFill::open(budget, pages.len());
                state = FillState::Accumulating;
            }
            FillState::Done => {}
        }
    }
    pages
}

fn resolve_item(resolver: &mut RowHeightResolver<'_>, spec: &TableSpec, item: &RowItem) -> f64 {
    resolver.resolve(row_template_for(spec, item), &item.to_value())
}

/// Group markers use the group row template when one is configured.
pub fn row_template_for<'s>(spec: &'s TableSpec, item: &RowItem) -> &'s TableRow {
    match (item, &spec.body.group_row_template) {
        (RowItem::Group { .. }, Some(template)) => template,
        _ => &spec.body.row_template,
    }
}

/// Resolve a header or footer block against an empty data object.
pub fn block_height(resolver: &mut RowHeightResolver<'_>, rows: &[TableRow]) -> f64 {
    resolver.resolve_block(rows, &Value::Object(Default::default()))
}
