//! Structural validation of templates.
//!
//! Catches malformed templates up front so pagination never loops or emits
//! degenerate rows.

use std::collections::HashSet;

use super::{PrintTemplate, TableRow, TableSpec, MAX_SLOTS_PER_PAGE};
use crate::error::LayoutError;

impl PrintTemplate {
    /// Check that this template can be paginated.
    pub fn validate(&self) -> Result<(), LayoutError> {
        validate_paper(self)?;

        let mut ids = HashSet::new();
        for el in &self.elements {
            if !ids.insert(el.id.as_str()) {
                return invalid(format!(
                    "duplicate element id '{}' on a {} element",
                    el.id,
                    el.kind_name()
                ));
            }
            check_finite(&el.id, "position", &[el.x, el.y, el.width, el.height])?;
        }

        let mut tables = self.elements.iter().filter(|el| el.is_table());
        if let (Some(first), Some(second)) = (tables.next(), tables.next()) {
            return invalid(format!(
                "only one table is supported, found '{}' and '{}'",
                first.id, second.id
            ));
        }

        if let Some((el, spec)) = self.table() {
            validate_table(&el.id, spec)?;
        }
        Ok(())
    }
}

fn validate_paper(template: &PrintTemplate) -> Result<(), LayoutError> {
    let paper = &template.paper;
    let m = &paper.margins;
    check_finite(
        "paper",
        "geometry",
        &[paper.width, paper.height, m.top, m.right, m.bottom, m.left],
    )?;
    if paper.width <= 0.0 || paper.height <= 0.0 {
        return invalid(format!(
            "paper size must be positive, got {}x{}mm",
            paper.width, paper.height
        ));
    }
    if [m.top, m.right, m.bottom, m.left].iter().any(|v| *v < 0.0) {
        return invalid("paper margins must not be negative".to_string());
    }
    if paper.inner_height() <= 0.0 {
        return invalid(format!(
            "margins leave no printable height on a {}mm page",
            paper.height
        ));
    }
    Ok(())
}

fn validate_table(id: &str, spec: &TableSpec) -> Result<(), LayoutError> {
    if spec.columns_count == 0 {
        return invalid(format!("table '{}': columnsCount must be at least 1", id));
    }
    if spec.body.row_template.cells.is_empty() {
        return invalid(format!("table '{}': body row template has no cells", id));
    }
    if let Some(rows_per_page) = spec.fixed_rows_per_page() {
        let slots = rows_per_page.checked_mul(spec.columns_count);
        if !slots.is_some_and(|n| n <= MAX_SLOTS_PER_PAGE) {
            return invalid(format!(
                "table '{}': rowsPerPage {} x columnsCount {} exceeds {} cells per page",
                id, rows_per_page, spec.columns_count, MAX_SLOTS_PER_PAGE
            ));
        }
    }
    for row in spec.all_rows() {
        validate_row(id, row)?;
    }
    if spec.columns_count > 1 && spec.fixed_rows_per_page().is_none() {
        log::warn!(
            "table '{}': columnsCount {} only applies with rowsPerPage; rows will be single-column",
            id,
            spec.columns_count
        );
    }
    Ok(())
}

fn validate_row(id: &str, row: &TableRow) -> Result<(), LayoutError> {
    if !row.height.is_finite() || row.height < 0.0 {
        return invalid(format!(
            "table '{}': row height must be a non-negative number, got {}",
            id, row.height
        ));
    }
    for cell in &row.cells {
        if !cell.width.is_finite() || cell.width < 0.0 {
            return invalid(format!(
                "table '{}': cell width must be a non-negative number, got {}",
                id, cell.width
            ));
        }
        if cell.col_span == 0 || cell.row_span == 0 {
            return invalid(format!("table '{}': cell spans must be at least 1", id));
        }
        if let Some(nested) = cell.content.iter().find(|el| el.is_table()) {
            return invalid(format!(
                "table '{}': cell contains nested table '{}'",
                id, nested.id
            ));
        }
    }
    Ok(())
}

fn check_finite(id: &str, what: &str, values: &[f64]) -> Result<(), LayoutError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        invalid(format!("'{}': {} contains a non-finite number", id, what))
    }
}

fn invalid(msg: String) -> Result<(), LayoutError> {
    Err(LayoutError::InvalidTemplate(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PaperConfig, PrintElement, TableCell};

    fn table_template(spec: TableSpec) -> PrintTemplate {
        PrintTemplate {
            paper: PaperConfig::a4(),
            elements: vec![PrintElement::table("t", spec).at(10.0, 20.0)],
            header_display: Default::default(),
            footer_display: Default::default(),
            fonts: vec![],
        }
    }

    fn body_row() -> TableRow {
        TableRow::fixed(8.0, vec![TableCell::new(50.0, vec![PrintElement::bound_text("n", "n")])])
    }

    fn message(result: Result<(), LayoutError>) -> String {
        match result {
            Err(LayoutError::InvalidTemplate(msg)) => msg,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn well_formed_template_passes() {
        assert!(table_template(TableSpec::new("items", body_row())).validate().is_ok());
    }

    #[test]
    fn zero_columns_rejected() {
        let mut spec = TableSpec::new("items", body_row());
        spec.columns_count = 0;
        assert!(message(table_template(spec).validate()).contains("columnsCount"));
    }

    #[test]
    fn empty_row_template_rejected() {
        let spec = TableSpec::new("items", TableRow::fixed(8.0, vec![]));
        assert!(message(table_template(spec).validate()).contains("no cells"));
    }

    #[test]
    fn oversized_pages_rejected() {
        let mut spec = TableSpec::new("items", body_row());
        spec.rows_per_page = Some(usize::MAX);
        spec.auto_fill_blank = true;
        assert!(message(table_template(spec).validate()).contains("cells per page"));

        let mut spec = TableSpec::new("items", body_row());
        spec.rows_per_page = Some(usize::MAX / 2);
        spec.columns_count = 3;
        assert!(message(table_template(spec).validate()).contains("cells per page"));

        let mut spec = TableSpec::new("items", body_row());
        spec.rows_per_page = Some(MAX_SLOTS_PER_PAGE / 2);
        spec.columns_count = 2;
        assert!(table_template(spec).validate().is_ok());
    }

    #[test]
    fn negative_heights_rejected() {
        let mut spec = TableSpec::new("items", body_row());
        spec.body.row_template.height = -1.0;
        assert!(message(table_template(spec).validate()).contains("row height"));
    }

    #[test]
    fn two_tables_rejected() {
        let mut t = table_template(TableSpec::new("items", body_row()));
        t.elements
            .push(PrintElement::table("t2", TableSpec::new("other", body_row())));
        assert!(message(t.validate()).contains("only one table"));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut t = table_template(TableSpec::new("items", body_row()));
        t.elements.push(PrintElement::text("t", "clash"));
        assert!(message(t.validate()).contains("duplicate element id"));
    }

    #[test]
    fn nested_tables_rejected() {
        let inner = PrintElement::table("inner", TableSpec::new("x", body_row()));
        let row = TableRow::fixed(8.0, vec![TableCell::new(50.0, vec![inner])]);
        let spec = TableSpec::new("items", row);
        assert!(message(table_template(spec).validate()).contains("nested table"));
    }

    #[test]
    fn margins_must_leave_room() {
        let mut t = table_template(TableSpec::new("items", body_row()));
        t.paper.margins.top = 200.0;
        t.paper.margins.bottom = 97.0;
        assert!(message(t.validate()).contains("no printable height"));
    }
}
