//! Schema loading, projection and JSON output
//!
//! A schema is a JSON document whose shape is the shape of the output. String
//! values are resolved against the markup (see [`crate::operators`]); arrays
//! holding a single object with a `recurrent_path` key are expanded once per
//! node matched by that path.

mod coercion;
mod projector;

pub use coercion::TypeSuffix;
pub use projector::{project, Projector};

use crate::error::{ErrorKind, X2jError};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Key naming the loop path of a recurrent template.
pub const RECURRENT_PATH: &str = "recurrent_path";

/// Prefix of a path relative to the current recurrent node.
pub const RECUR_ELEM: &str = "RECUR_ELEM(";

/// Parse schema text. Blank text means "no schema".
pub fn load_schema(text: &str) -> Result<Option<Value>, X2jError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| X2jError::new(ErrorKind::SchemaParse, e.to_string()))
}

/// Read schema text from a file.
pub fn read_schema_file(path: impl AsRef<Path>) -> Result<String, X2jError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| {
        X2jError::new(
            ErrorKind::SchemaRead,
            format!("cannot read '{}': {e}", path.display()),
        )
    })
}

/// Pretty-print `value` with `indent` spaces per level.
pub fn emit_json(value: &Value, indent: usize) -> Result<Vec<u8>, X2jError> {
    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| X2jError::new(ErrorKind::Persist, e.to_string()))?;
    Ok(buffer)
}

/// Write `value` to `path` as pretty-printed JSON.
pub fn persist_json(value: &Value, path: impl AsRef<Path>, indent: usize) -> Result<(), X2jError> {
    let path = path.as_ref();
    let mut bytes = emit_json(value, indent)?;
    bytes.push(b'\n');
    fs::write(path, bytes).map_err(|e| {
        X2jError::new(
            ErrorKind::Persist,
            format!("cannot write '{}': {e}", path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use serde_json::json;

    #[test]
    fn blank_schema_is_absent() {
        assert_eq!(load_schema("").unwrap(), None);
        assert_eq!(load_schema(" \n\t").unwrap(), None);
        assert_eq!(load_schema(r#"{"a":1}"#).unwrap(), Some(json!({"a": 1})));
    }

    #[test]
    fn malformed_schema_is_a_parse_error() {
        let err = load_schema("{\"a\":").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SchemaParse);
    }

    #[test]
    fn missing_schema_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_schema_file(dir.path().join("none.json")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SchemaRead);
    }

    #[test]
    fn emits_with_requested_indent() {
        let value = json!({"b": [1, "x"], "a": {"c": true}});
        let text = String::from_utf8(emit_json(&value, 4).unwrap()).unwrap();
        assert_snapshot!(text, @r###"
        {
            "b": [
                1,
                "x"
            ],
            "a": {
                "c": true
            }
        }
        "###);
        let compact = String::from_utf8(emit_json(&json!({"a": 1}), 1).unwrap()).unwrap();
        assert_eq!(compact, "{\n \"a\": 1\n}");
    }

    #[test]
    fn persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.json");
        persist_json(&json!({"k": "v"}), &target, 2).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "{\n  \"k\": \"v\"\n}\n");

        let err = persist_json(&json!({}), dir.path().join("no/such/dir.json"), 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Persist);
    }
}
