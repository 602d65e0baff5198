//! Structured error types for the pagewright engine.
//!
//! Three variants cover the real error sources: JSON parsing, template
//! validation, and font loading. Measurement failures never reach this type;
//! the row height resolver absorbs them.

use serde_json::error::Category;
use thiserror::Error;

/// The unified error type returned by all public pagewright API functions.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// JSON input failed to parse as a valid template, data object or config.
    #[error("Failed to parse input: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: &'static str,
    },
    /// The template is structurally malformed and cannot be paginated.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
    /// A font could not be decoded or parsed.
    #[error("Font error: {0}")]
    Font(String),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(source: serde_json::Error) -> Self {
        let hint = parse_hint(source.classify());
        LayoutError::Parse { source, hint }
    }
}

/// What to look at for each class of JSON failure.
fn parse_hint(category: Category) -> &'static str {
    match category {
        Category::Syntax => "look for a trailing comma, an unquoted key or an unescaped quote",
        Category::Data => {
            "the JSON is well formed but a field has the wrong name or type, e.g. an element without \"type\""
        }
        Category::Eof => "the input ends early; the file may be truncated",
        Category::Io => "",
    }
}
