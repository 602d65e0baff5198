//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::measure::StyleHints;

/// Knobs that are not part of the template itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Group name used for items whose group-by field is missing or falsy.
    ///
    /// Defaults to `"Unclassified"`.
    pub unclassified_label: String,

    /// Text metrics used when a cell element's style bag doesn't override them.
    pub style_hints: StyleHints,

    /// Prefix of the `pageData` key holding a page's rows. The table id and
    /// `_data` are appended, giving `__table_<id>_data` by default.
    pub page_data_key_prefix: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            unclassified_label: "Unclassified".to_string(),
            style_hints: StyleHints::default(),
            page_data_key_prefix: "__table_".to_string(),
        }
    }
}

impl LayoutConfig {
    /// The `pageData` key under which a table's page rows are published.
    pub fn page_data_key(&self, table_id: &str) -> String {
        format!("{}{}_data", self.page_data_key_prefix, table_id)
    }
}
