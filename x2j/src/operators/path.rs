//! `XPATH(...)` and `VALUE(...)`: values read directly from the markup.

use crate::error::X2jError;
use crate::markup::{encode_text, is_blank_text, serialize_element};
use crate::path::{compile, resolve_attribute, resolve_element};
use roxmltree::Node;

/// Attribute value, first non-blank text child, or first child element of the
/// node selected by `path`.
pub fn direct_path(context: Node<'_, '_>, path: &str) -> Result<String, X2jError> {
    let path = path.trim();
    if compile(path)?.targets_value() {
        return Ok(encode_text(&resolve_attribute(context, path)?));
    }

    let Some(element) = resolve_element(context, path)? else {
        return Ok(String::new());
    };

    let text = element
        .children()
        .find(|child| child.is_text() && !is_blank_text(*child));
    if let Some(text) = text {
        return Ok(encode_text(text.text().unwrap_or_default()));
    }

    match element.first_element_child() {
        Some(child) => Ok(encode_text(&serialize_element(child)?)),
        None => Ok(String::new()),
    }
}

/// Trimmed text of the selected node, or the serialization of its element children.
/// Attribute values are returned as `XPATH(...)` returns them.
pub fn resolved_value(context: Node<'_, '_>, path: &str) -> Result<String, X2jError> {
    let path = path.trim();
    let compiled = compile(path)?;
    if compiled.targets_attribute() {
        return Ok(encode_text(&resolve_attribute(context, path)?));
    }
    if compiled.targets_value() {
        return Ok(encode_text(resolve_attribute(context, path)?.trim()));
    }

    let Some(element) = resolve_element(context, path)? else {
        return Ok(String::new());
    };

    let significant: Vec<Node<'_, '_>> = element
        .children()
        .filter(|child| child.is_element() || (child.is_text() && !is_blank_text(*child)))
        .collect();

    match significant.as_slice() {
        [] => Ok(String::new()),
        [only] if only.is_text() => Ok(encode_text(only.text().unwrap_or_default().trim())),
        [only] => Ok(encode_text(&serialize_element(*only)?)),
        many => {
            let mut value = String::new();
            for child in many.iter().filter(|child| child.is_element()) {
                value.push_str(&encode_text(&serialize_element(*child)?));
            }
            Ok(value)
        }
    }
}
