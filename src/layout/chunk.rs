//! Column-flow chunking.
//!
//! Rearranges a flat item sequence into table rows of exactly `columns`
//! cells. Row-major flow fills across then down. Column-major flow fills
//! down each column of a page, then moves to the next column; it works on
//! one page's worth of items at a time so no page exceeds `rows_per_page`.

use crate::model::{DataFlow, PageRow, RowItem};

pub fn chunk_rows(
    items: Vec<RowItem>,
    columns: usize,
    flow: DataFlow,
    rows_per_page: usize,
) -> Vec<PageRow> {
    if columns <= 1 {
        return items.into_iter().map(|item| vec![item]).collect();
    }
    match flow {
        DataFlow::RowMajor => chunk_row_major(items, columns),
        DataFlow::ColumnMajor => chunk_column_major(items, columns, rows_per_page.max(1)),
    }
}

fn chunk_row_major(items: Vec<RowItem>, columns: usize) -> Vec<PageRow> {
    let mut rows = Vec::with_capacity(items.len().div_ceil(columns));
    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        let mut row: PageRow = iter.by_ref().take(columns).collect();
        row.resize(columns, RowItem::Blank);
        rows.push(row);
    }
    rows
}

fn chunk_column_major(items: Vec<RowItem>, columns: usize, rows_per_page: usize) -> Vec<PageRow> {
    let block_size = rows_per_page.saturating_mul(columns);
    let mut rows = Vec::new();
    let mut iter = items.into_iter().peekable();

    while iter.peek().is_some() {
        let mut block: Vec<Option<RowItem>> = iter.by_ref().take(block_size).map(Some).collect();
        let block_rows = block.len().div_ceil(columns);

        for r in 0..block_rows {
            let row = (0..columns)
                .map(|c| {
                    block
                        .get_mut(c * block_rows + r)
                        .and_then(Option::take)
                        .unwrap_or(RowItem::Blank)
                })
                .collect();
            rows.push(row);
        }
    }
    rows
}
