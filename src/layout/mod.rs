//! # Page Assembly
//!
//! Turns a template and its data into the ordered list of pages a renderer
//! paints.
//!
//! ## Pipeline
//!
//! ```text
//! data[table.dataKey]
//!       ↓
//!   [group]     optional: cluster by groupBy, interleave group markers
//!       ↓
//!   [paginate]  fixed rows per page (with [chunk] column flow),
//!               or height bounded (with [rows] height resolution)
//!       ↓
//!   [select]    per page: which header/footer companions, table y
//!       ↓
//!   ComputedPage × N, then page numbers and totals are stamped
//! ```
//!
//! The page count of a height-bounded table is unknowable until the last row
//! is placed, so `totalPages` and page-info text are filled in only after
//! every page exists.

pub mod chunk;
pub mod group;
pub mod paginate;
pub mod rows;
pub mod select;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::measure::Measurer;
use crate::model::*;
use crate::units::mm_to_px;

use paginate::{block_height, paginate_by_height, paginate_fixed, HeightBudget, TablePages};
use rows::RowHeightResolver;
use select::{select_elements, table_y, PagePosition};

/// One printable page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedPage {
    /// 1-based.
    pub page_number: usize,
    pub total_pages: usize,
    /// Elements to draw on this page, in template order.
    pub elements: Vec<PrintElement>,
    pub paper_config: Arc<PaperConfig>,
    /// The business data, plus this page's table rows under the key the
    /// table element's body is rebound to.
    pub page_data: BusinessData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableSlice>,
}

/// The part of a table that lands on one page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSlice {
    pub table_id: String,
    /// Key of these rows in `page_data`.
    pub data_key: String,
    pub rows: Vec<PageRow>,
    pub header_visible: bool,
    pub footer_visible: bool,
    /// Table y on this page, in mm.
    pub y: f64,
}

impl TableSlice {
    /// Rows that carry data or group markers, i.e. everything but padding.
    pub fn content_rows(&self) -> impl Iterator<Item = &PageRow> {
        self.rows
            .iter()
            .filter(|row| !row.iter().all(RowItem::is_blank))
    }
}

/// The pagination engine for one template and one data object.
pub struct LayoutEngine<'a> {
    template: &'a PrintTemplate,
    data: &'a BusinessData,
    config: LayoutConfig,
}

impl<'a> LayoutEngine<'a> {
    /// Validate the template and bind it to `data`.
    pub fn new(template: &'a PrintTemplate, data: &'a BusinessData) -> Result<Self, LayoutError> {
        template.validate()?;
        Ok(Self {
            template,
            data,
            config: LayoutConfig::default(),
        })
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Compute every page. `measurer` sizes `auto` rows; it is borrowed
    /// exclusively for the run.
    pub fn compute_pages(&self, measurer: &mut dyn Measurer) -> Vec<ComputedPage> {
        let paper = Arc::new(self.template.paper.clone());

        // Without a table the template is its own single page, elements as-is.
        let Some((table_el, spec)) = self.template.table() else {
            return vec![ComputedPage {
                page_number: 1,
                total_pages: 1,
                elements: self.template.elements.clone(),
                paper_config: paper,
                page_data: self.data.clone(),
                table: None,
            }];
        };

        let items = self.table_items(table_el, spec);
        let mut resolver = RowHeightResolver::new(measurer, self.config.style_hints);
        let table_pages = match spec.fixed_rows_per_page() {
            Some(rows_per_page) => paginate_fixed(items, spec, rows_per_page),
            None => {
                let budget = self.height_budget(table_el, spec, &mut resolver);
                paginate_by_height(items, spec, &budget, &mut resolver)
            }
        };

        log::info!(
            "Table '{}' paginated into {} page(s) ({})",
            table_el.id,
            table_pages.len(),
            if spec.fixed_rows_per_page().is_some() {
                "fixed rows per page"
            } else {
                "height bounded"
            }
        );

        let mut pages = self.assemble(table_el, spec, table_pages, &paper);
        stamp_page_numbers(&mut pages);
        pages
    }

    /// The table's data array, grouped when `groupBy` is set.
    fn table_items(&self, table_el: &PrintElement, spec: &TableSpec) -> Vec<RowItem> {
        let key = spec.body.data_key.as_ref().or(table_el.data_key.as_ref());
        let items: &[Value] = match key.and_then(|k| self.data.get(k)) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                log::debug!(
                    "Table '{}': data key {:?} is not an array ({}), treating as empty",
                    table_el.id,
                    key,
                    json_kind(other)
                );
                &[]
            }
            None => {
                log::debug!("Table '{}': data key {:?} not found, treating as empty", table_el.id, key);
                &[]
            }
        };

        match &spec.group_by {
            Some(group_by) => group::group_items(items, group_by, &self.config.unclassified_label),
            None => group::index_items(items),
        }
    }

    fn height_budget(
        &self,
        table_el: &PrintElement,
        spec: &TableSpec,
        resolver: &mut RowHeightResolver<'_>,
    ) -> HeightBudget {
        let footer_reserve_px = match &spec.footer {
            Some(footer)
                if footer.position == FooterPosition::Fixed
                    && footer.repeat != FooterRepeat::None =>
            {
                block_height(resolver, &footer.rows)
            }
            _ => 0.0,
        };
        let budget = HeightBudget {
            page_inner_px: mm_to_px(self.template.paper.inner_height()),
            first_page_start_px: mm_to_px(table_el.y),
            footer_reserve_px,
            header_px: block_height(resolver, spec.header_rows()),
            header_repeat: spec.header.as_ref().map_or(HeaderRepeat::None, |h| h.repeat),
        };
        log::debug!("Table '{}' height budget: {:?}", table_el.id, budget);
        budget
    }

    fn assemble(
        &self,
        table_el: &PrintElement,
        spec: &TableSpec,
        table_pages: TablePages,
        paper: &Arc<PaperConfig>,
    ) -> Vec<ComputedPage> {
        let total = table_pages.len();
        let data_key = self.config.page_data_key(&table_el.id);

        table_pages
            .into_iter()
            .enumerate()
            .map(|(index, rows)| {
                let pos = PagePosition::new(index, total);
                let mut elements = select_elements(self.template, table_el, pos);
                for el in &mut elements {
                    if let ElementKind::Table(page_spec) = &mut el.kind {
                        page_spec.body.data_key = Some(data_key.clone());
                    }
                }

                let mut page_data = self.data.clone();
                page_data.insert(data_key.clone(), rows_to_value(&rows));

                let header_visible = spec
                    .header
                    .as_ref()
                    .is_some_and(|h| !h.rows.is_empty() && h.repeat.shows_on(pos.is_first));
                let footer_visible = spec
                    .footer
                    .as_ref()
                    .is_some_and(|f| !f.rows.is_empty() && f.repeat.shows_on(pos.is_last));

                ComputedPage {
                    page_number: index + 1,
                    total_pages: 0,
                    elements,
                    paper_config: Arc::clone(paper),
                    page_data,
                    table: Some(TableSlice {
                        table_id: table_el.id.clone(),
                        data_key: data_key.clone(),
                        rows,
                        header_visible,
                        footer_visible,
                        y: table_y(self.template, table_el.y, pos),
                    }),
                }
            })
            .collect()
    }
}

/// Stamp the final page count and fill in page-info text.
fn stamp_page_numbers(pages: &mut [ComputedPage]) {
    let total = pages.len();
    for page in pages.iter_mut() {
        page.total_pages = total;
        let page_number = page.page_number;
        for el in &mut page.elements {
            if let ElementKind::PageInfo { format, text } = &mut el.kind {
                *text = Some(format_page_info(format, page_number, total));
            }
        }
    }
}

/// Substitute `{pageNumber}` and `{totalPages}` in a page-info format.
pub fn format_page_info(format: &str, page_number: usize, total_pages: usize) -> String {
    format
        .replace("{pageNumber}", &page_number.to_string())
        .replace("{totalPages}", &total_pages.to_string())
}

fn rows_to_value(rows: &[PageRow]) -> Value {
    Value::Array(
        rows.iter()
            .map(|row| Value::Array(row.iter().map(RowItem::to_value).collect()))
            .collect(),
    )
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::Unmeasured;
    use serde_json::json;

    fn data(v: Value) -> BusinessData {
        v.as_object().cloned().unwrap()
    }

    fn simple_template(spec: TableSpec) -> PrintTemplate {
        PrintTemplate {
            paper: PaperConfig::a4(),
            elements: vec![
                PrintElement::page_info("pager", "Page {pageNumber} of {totalPages}").at(150.0, 285.0),
                PrintElement::table("lines", spec).at(10.0, 20.0),
            ],
            header_display: HeaderDisplay::PerPage,
            footer_display: FooterDisplay::PerPage,
            fonts: vec![],
        }
    }

    fn body_row() -> TableRow {
        TableRow::fixed(8.0, vec![TableCell::new(50.0, vec![PrintElement::bound_text("n", "n")])])
    }

    #[test]
    fn page_info_placeholders() {
        assert_eq!(format_page_info("{pageNumber}/{totalPages}", 2, 5), "2/5");
        assert_eq!(format_page_info("static", 1, 1), "static");
    }

    #[test]
    fn totals_and_page_info_are_stamped() {
        let mut spec = TableSpec::new("items", body_row());
        spec.rows_per_page = Some(2);
        let template = simple_template(spec);
        let d = data(json!({"items": [{"n": 1}, {"n": 2}, {"n": 3}]}));
        let engine = LayoutEngine::new(&template, &d).unwrap();
        let pages = engine.compute_pages(&mut Unmeasured);

        assert_eq!(pages.len(), 2);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.page_number, i + 1);
            assert_eq!(page.total_pages, 2);
            match &page.elements[0].kind {
                ElementKind::PageInfo { text, .. } => {
                    assert_eq!(text.as_deref(), Some(format!("Page {} of 2", i + 1).as_str()))
                }
                other => panic!("expected page info, got {other:?}"),
            }
        }
    }

    #[test]
    fn table_less_page_keeps_page_info_untouched() {
        let template = PrintTemplate {
            paper: PaperConfig::a4(),
            elements: vec![
                PrintElement::text("title", "Receipt").at(10.0, 10.0),
                PrintElement::page_info("pager", "{pageNumber}/{totalPages}").at(180.0, 285.0),
            ],
            header_display: HeaderDisplay::PerPage,
            footer_display: FooterDisplay::PerPage,
            fonts: vec![],
        };
        let d = BusinessData::new();
        let pages = LayoutEngine::new(&template, &d)
            .unwrap()
            .compute_pages(&mut Unmeasured);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].total_pages, 1);
        assert_eq!(pages[0].elements, template.elements);
    }

    #[test]
    fn table_body_is_rebound_to_page_rows() {
        let mut spec = TableSpec::new("items", body_row());
        spec.rows_per_page = Some(2);
        let template = simple_template(spec);
        let d = data(json!({"items": [{"n": 1}, {"n": 2}, {"n": 3}], "customer": "ACME"}));
        let pages = LayoutEngine::new(&template, &d)
            .unwrap()
            .compute_pages(&mut Unmeasured);

        let table = pages[1].elements[1].as_table().unwrap();
        assert_eq!(table.body.data_key.as_deref(), Some("__table_lines_data"));
        assert_eq!(pages[1].page_data["__table_lines_data"], json!([[{"n": 3}]]));
        assert_eq!(pages[1].page_data["customer"], json!("ACME"));
        assert!(Arc::ptr_eq(&pages[0].paper_config, &pages[1].paper_config));
    }

    #[test]
    fn element_data_key_is_a_fallback() {
        let mut spec = TableSpec::new("unused", body_row());
        spec.body.data_key = None;
        spec.rows_per_page = Some(10);
        let mut template = simple_template(spec);
        template.elements[1].data_key = Some("rows".into());
        let d = data(json!({"rows": [{"n": 1}, {"n": 2}]}));
        let pages = LayoutEngine::new(&template, &d)
            .unwrap()
            .compute_pages(&mut Unmeasured);
        assert_eq!(pages[0].table.as_ref().unwrap().rows.len(), 2);
    }

    #[test]
    fn non_array_data_is_empty() {
        let template = simple_template(TableSpec::new("items", body_row()));
        let d = data(json!({"items": "oops"}));
        let pages = LayoutEngine::new(&template, &d)
            .unwrap()
            .compute_pages(&mut Unmeasured);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].table.as_ref().unwrap().rows.is_empty());
    }

    #[test]
    fn custom_page_data_prefix() {
        let mut spec = TableSpec::new("items", body_row());
        spec.rows_per_page = Some(5);
        let template = simple_template(spec);
        let d = data(json!({"items": [{"n": 1}]}));
        let config = LayoutConfig {
            page_data_key_prefix: "rows_of_".into(),
            ..Default::default()
        };
        let pages = LayoutEngine::new(&template, &d)
            .unwrap()
            .with_config(config)
            .compute_pages(&mut Unmeasured);
        assert!(pages[0].page_data.contains_key("rows_of_lines_data"));
        assert_eq!(pages[0].table.as_ref().unwrap().data_key, "rows_of_lines_data");
    }

    #[test]
    fn header_and_footer_visibility_follow_repeat() {
        let mut spec = TableSpec::new("items", body_row());
        spec.rows_per_page = Some(1);
        spec.header = Some(TableHeader {
            rows: vec![body_row()],
            repeat: HeaderRepeat::First,
        });
        spec.footer = Some(TableFooter {
            rows: vec![body_row()],
            repeat: FooterRepeat::Last,
            position: FooterPosition::Follow,
        });
        let template = simple_template(spec);
        let d = data(json!({"items": [{"n": 1}, {"n": 2}, {"n": 3}]}));
        let pages = LayoutEngine::new(&template, &d)
            .unwrap()
            .compute_pages(&mut Unmeasured);
        let flags: Vec<(bool, bool)> = pages
            .iter()
            .map(|p| {
                let t = p.table.as_ref().unwrap();
                (t.header_visible, t.footer_visible)
            })
            .collect();
        assert_eq!(flags, vec![(true, false), (false, false), (false, true)]);
    }

    #[test]
    fn content_rows_skip_padding() {
        let slice = TableSlice {
            table_id: "t".into(),
            data_key: "k".into(),
            rows: vec![
                vec![RowItem::Group { name: "A".into() }],
                vec![RowItem::Blank],
            ],
            header_visible: false,
            footer_visible: false,
            y: 0.0,
        };
        assert_eq!(slice.content_rows().count(), 1);
    }

    #[test]
    fn invalid_template_is_rejected_at_construction() {
        let mut spec = TableSpec::new("items", body_row());
        spec.columns_count = 0;
        let template = simple_template(spec);
        let d = BusinessData::new();
        assert!(matches!(
            LayoutEngine::new(&template, &d),
            Err(LayoutError::InvalidTemplate(_))
        ));
    }
}
