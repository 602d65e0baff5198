//! Per-page element selection.
//!
//! Elements above the table are header companions and elements below it are
//! footer companions. The template's display policies decide which of them
//! appear on a given page. The table and page-info fields appear on every
//! page.

use crate::model::{FooterDisplay, HeaderDisplay, PrintElement, PrintTemplate};

/// Position of a page within the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePosition {
    pub is_first: bool,
    pub is_last: bool,
}

impl PagePosition {
    pub fn new(index: usize, total: usize) -> Self {
        Self {
            is_first: index == 0,
            is_last: index + 1 == total,
        }
    }
}

/// Whether `el` appears on a page at `pos`, given the table's declared y.
pub fn is_visible(
    el: &PrintElement,
    table_y: f64,
    header_display: HeaderDisplay,
    footer_display: FooterDisplay,
    pos: PagePosition,
) -> bool {
    if el.is_table() || el.is_page_info() {
        return true;
    }
    if el.y < table_y {
        return header_display == HeaderDisplay::PerPage || pos.is_first;
    }
    if el.y > table_y {
        return footer_display == FooterDisplay::PerPage || pos.is_last;
    }
    true
}

/// The table's y on this page, in mm.
///
/// When header companions only show on the first page, continuation pages
/// pull the table up to the top margin. Otherwise the declared y is kept so
/// the table doesn't overlap repeated header elements.
pub fn table_y(template: &PrintTemplate, declared_y: f64, pos: PagePosition) -> f64 {
    if template.header_display == HeaderDisplay::FirstPageOnly && !pos.is_first {
        template.paper.margins.top
    } else {
        declared_y
    }
}

/// Elements for one page, in template order, with the table moved to its
/// page-relative y.
pub fn select_elements(
    template: &PrintTemplate,
    table: &PrintElement,
    pos: PagePosition,
) -> Vec<PrintElement> {
    template
        .elements
        .iter()
        .filter(|el| {
            is_visible(
                el,
                table.y,
                template.header_display,
                template.footer_display,
                pos,
            )
        })
        .map(|el| {
            let mut el = el.clone();
            if el.is_table() {
                el.y = table_y(template, table.y, pos);
            }
            el
        })
        .collect()
}
