//! Markup loading and text helpers
//!
//! Parsing is delegated to `roxmltree`; the resulting document borrows the
//! source text, so callers keep the `String` returned by [`read_markup_file`]
//! alive for as long as the document is in use.

mod serializer;

pub use serializer::serialize_element;
pub(crate) use serializer::qualified_name;

use crate::error::{ErrorKind, X2jError};
use roxmltree::{Document, ParsingOptions};
use std::fs;
use std::path::Path;

/// Parse markup text into a read-only document.
pub fn load_markup(source: &str) -> Result<Document<'_>, X2jError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(source, options)
        .map_err(|e| X2jError::new(ErrorKind::MarkupParse, format!("XML parsing error: {e}")))
}

/// Read a markup file into memory.
pub fn read_markup_file(path: impl AsRef<Path>) -> Result<String, X2jError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| {
        X2jError::new(
            ErrorKind::MarkupRead,
            format!("cannot read '{}': {e}", path.display()),
        )
    })
}

/// Replace the five XML-significant characters with their entity forms.
pub fn encode_text(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => encoded.push_str("&lt;"),
            '>' => encoded.push_str("&gt;"),
            '&' => encoded.push_str("&amp;"),
            '"' => encoded.push_str("&quot;"),
            '\'' => encoded.push_str("&apos;"),
            other => encoded.push(other),
        }
    }
    encoded
}

/// True for text nodes made only of whitespace (indentation between elements).
pub(crate) fn is_blank_text(node: roxmltree::Node<'_, '_>) -> bool {
    node.is_text() && node.text().map_or(true, |t| t.trim().is_empty())
}
