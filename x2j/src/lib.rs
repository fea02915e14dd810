//! Schema-driven XML to JSON conversion
//!
//!     This crate turns an XML document into JSON. The shape of the output is described by a
//!     JSON schema whose string values say where each value comes from in the markup. Without
//!     a schema, the markup structure is mapped onto JSON directly.
//!
//!     This is a pure lib: it powers the x2j cli but makes no assumption about a shell
//!     environment (no printing, no env vars, no exit codes). The only side effects are the
//!     explicit file helpers (read_markup_file, read_schema_file, persist_json).
//!
//! Architecture
//!
//!     .
//!     ├── error.rs                # X2jError and the catalog codes of every failure
//!     ├── path                    # Location paths (an XPath 1.0 subset)
//!     │   ├── ast.rs
//!     │   ├── parser.rs
//!     │   └── evaluator.rs        # Node-set evaluation over roxmltree
//!     ├── markup                  # Loading, serialization and entity encoding
//!     ├── operators               # XPATH, VALUE, CONCAT, LEN, UPPER, LOWER, SUBSTR
//!     ├── schema                  # Schema loading, projection, coercion, JSON output
//!     └── structural.rs           # Default projection without a schema
//!
//! Schema Strings
//!
//!     Every string in the schema is one of:
//!
//!     - KEYWORD(argument)[:INT|:DBL|:BOOL]    resolved by the operator, then coerced
//!     - RECUR_ELEM(path)[:suffix]             relative to the current node of a recurrent template
//!     - anything else                         copied verbatim
//!
//!     An array holding a single object with a "recurrent_path" key is a recurrent template:
//!     it is expanded once per node the path matches, in document order.
//!
//! Failure
//!
//!     Every failure aborts the whole conversion. No partial JSON is ever returned.
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     └── <area>
//!         ├── mod.rs
//!         └── fixtures
//!
//!     Rust does not discover tests in subdirectories, so tests/lib.rs includes them.
//!
pub mod error;
pub mod markup;
pub mod operators;
pub mod path;
pub mod schema;
pub mod structural;

pub use error::{ErrorKind, X2jError};
pub use markup::{load_markup, read_markup_file};
pub use schema::{emit_json, load_schema, persist_json, read_schema_file};
pub use structural::project_structure;

use roxmltree::{Document, Node};
use serde_json::Value;
use tracing::debug;

/// Name of the element that may carry a schema inside the markup itself.
pub const EMBEDDED_SCHEMA_ELEMENT: &str = "JSONSchema";

/// Convert the markup rooted at `root`.
///
/// With a schema, the schema is projected against the markup; without one,
/// the markup structure is projected as is.
pub fn convert(root: Node<'_, '_>, schema: Option<&Value>) -> Result<Value, X2jError> {
    match schema {
        Some(schema) => {
            debug!("projecting with schema");
            schema::project(schema, root)
        }
        None => {
            debug!("projecting markup structure");
            project_structure(root)
        }
    }
}

/// Convert a parsed document, using its embedded `JSONSchema` element if any.
pub fn convert_document(doc: &Document<'_>) -> Result<Value, X2jError> {
    let schema = match embedded_schema(doc) {
        Some(text) => load_schema(&text)?,
        None => None,
    };
    convert(doc.root_element(), schema.as_ref())
}

/// Parse `markup` and convert it.
///
/// A non-blank `schema` always wins over a schema embedded in the markup.
pub fn convert_str(markup: &str, schema: Option<&str>) -> Result<Value, X2jError> {
    let doc = load_markup(markup)?;
    match schema.map(load_schema).transpose()?.flatten() {
        Some(schema) => convert(doc.root_element(), Some(&schema)),
        None => convert_document(&doc),
    }
}

/// Text content of the first `JSONSchema` element in the document.
pub fn embedded_schema(doc: &Document<'_>) -> Option<String> {
    doc.descendants()
        .find(|node| node.is_element() && node.tag_name().name() == EMBEDDED_SCHEMA_ELEMENT)
        .map(|node| {
            node.descendants()
                .filter(|child| child.is_text())
                .filter_map(|child| child.text())
                .collect()
        })
}
