//! Default projection used when no schema is supplied
//!
//! The markup structure maps directly onto JSON:
//!
//! - the root element becomes the single top-level key;
//! - attributes and child elements become keys, repeated names become arrays;
//! - text is trimmed and stored under `content`, or replaces the element
//!   entirely when the element has nothing else;
//! - empty elements become `""`.
//!
//! Scalars are inferred from text: booleans, `null` and numbers are emitted
//! as JSON values, everything else stays a string.

use crate::error::{ErrorKind, X2jError};
use crate::markup::qualified_name;
use roxmltree::{Node, NodeType};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

/// Key holding an element's text when it also has attributes or children.
pub const CONTENT_KEY: &str = "content";

/// Project an element structurally as `{ <name>: <value> }`.
pub fn project_structure(node: Node<'_, '_>) -> Result<Value, X2jError> {
    if !node.is_element() {
        return Err(X2jError::new(
            ErrorKind::MarkupParse,
            format!("cannot project a {:?} node without a schema", node.node_type()),
        ));
    }
    let mut root = Map::new();
    root.insert(element_name(node), element_value(node));
    Ok(Value::Object(root))
}

fn element_name(node: Node<'_, '_>) -> String {
    let tag = node.tag_name();
    qualified_name(node, tag.namespace(), tag.name())
}

fn element_value(node: Node<'_, '_>) -> Value {
    let mut fields = Fields::default();
    let mut structured = false;

    for attr in node.attributes() {
        structured = true;
        let name = qualified_name(node, attr.namespace(), attr.name());
        fields.push(name, infer_scalar(attr.value()));
    }

    for child in node.children() {
        match child.node_type() {
            NodeType::Element => {
                structured = true;
                fields.push(element_name(child), element_value(child));
            }
            NodeType::Text => {
                let text = child.text().unwrap_or_default().trim();
                if !text.is_empty() {
                    fields.push(CONTENT_KEY.to_string(), infer_scalar(text));
                }
            }
            _ => {}
        }
    }

    if fields.is_empty() {
        return Value::String(String::new());
    }
    if !structured {
        if let Some(content) = fields.take(CONTENT_KEY) {
            return content;
        }
    }
    fields.into_value()
}

/// Values gathered per key in first-seen order. Keys seen more than once
/// become arrays.
#[derive(Default)]
struct Fields {
    index: HashMap<String, usize>,
    entries: Vec<(String, Vec<Value>)>,
}

impl Fields {
    fn push(&mut self, key: String, value: Value) {
        match self.index.get(&key) {
            Some(&at) => self.entries[at].1.push(value),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![value]));
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The collapsed value of `key`, when it is the only key.
    fn take(&mut self, key: &str) -> Option<Value> {
        match self.entries.as_slice() {
            [(only, _)] if only == key => self.entries.pop().map(|(_, values)| collapse(values)),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Object(
            self.entries
                .into_iter()
                .map(|(key, values)| (key, collapse(values)))
                .collect(),
        )
    }
}

fn collapse(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.pop().unwrap_or(Value::Null)
    } else {
        Value::Array(values)
    }
}

/// Interpret trimmed text as a JSON scalar where it reads as one.
pub fn infer_scalar(text: &str) -> Value {
    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if text.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if is_numeral(text) {
        if let Ok(integer) = text.parse::<i64>() {
            return Value::from(integer);
        }
        if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    }
    Value::String(text.to_string())
}

/// Decimal numeral with an optional sign, fraction and exponent, and no
/// leading zeros in the integer part.
fn is_numeral(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };
    let (integer, fraction) = match mantissa.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (mantissa, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer) || (integer.len() > 1 && integer.starts_with('0')) {
        return false;
    }
    if fraction.is_some_and(|fraction| !all_digits(fraction)) {
        return false;
    }
    match exponent {
        Some(exponent) => {
            let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
            all_digits(digits)
        }
        None => true,
    }
}
