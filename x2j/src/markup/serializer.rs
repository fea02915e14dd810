//! Markup serialization
//!
//! Writes an element subtree back to XML text without an XML declaration.
//! Empty elements use the self-closing form; namespace declarations are
//! emitted on the serialized element for every prefix in scope and on
//! descendants only where a new binding appears.

use crate::error::{ErrorKind, X2jError};
use roxmltree::{Node, NodeType};

/// Serialize an element and its subtree.
pub fn serialize_element(node: Node<'_, '_>) -> Result<String, X2jError> {
    if !node.is_element() {
        return Err(X2jError::new(
            ErrorKind::Serialization,
            format!("expected an element, found {:?} node", node.node_type()),
        ));
    }
    let mut output = String::new();
    write_node(node, true, &mut output);
    Ok(output)
}

fn write_node(node: Node<'_, '_>, is_top: bool, out: &mut String) {
    match node.node_type() {
        NodeType::Root => {
            for child in node.children() {
                write_node(child, false, out);
            }
        }
        NodeType::Element => write_element(node, is_top, out),
        NodeType::Text => escape_into(node.text().unwrap_or_default(), false, out),
        NodeType::Comment => {
            out.push_str("<!--");
            out.push_str(node.text().unwrap_or_default());
            out.push_str("-->");
        }
        NodeType::PI => {
            if let Some(pi) = node.pi() {
                out.push_str("<?");
                out.push_str(pi.target);
                if let Some(value) = pi.value {
                    out.push(' ');
                    out.push_str(value);
                }
                out.push_str("?>");
            }
        }
    }
}

fn write_element(node: Node<'_, '_>, is_top: bool, out: &mut String) {
    let tag = node.tag_name();
    let name = qualified_name(node, tag.namespace(), tag.name());

    out.push('<');
    out.push_str(&name);

    for ns in node.namespaces() {
        if ns.name() == Some("xml") {
            continue;
        }
        let inherited = !is_top
            && node.parent_element().is_some_and(|parent| {
                parent
                    .namespaces()
                    .any(|p| p.name() == ns.name() && p.uri() == ns.uri())
            });
        if inherited {
            continue;
        }
        match ns.name() {
            Some(prefix) => {
                out.push_str(" xmlns:");
                out.push_str(prefix);
            }
            None => out.push_str(" xmlns"),
        }
        out.push_str("=\"");
        escape_into(ns.uri(), true, out);
        out.push('"');
    }

    for attr in node.attributes() {
        out.push(' ');
        out.push_str(&qualified_name(node, attr.namespace(), attr.name()));
        out.push_str("=\"");
        escape_into(attr.value(), true, out);
        out.push('"');
    }

    if !node.has_children() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in node.children() {
        write_node(child, false, out);
    }
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

pub(crate) fn qualified_name(scope: Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| scope.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

fn escape_into(text: &str, in_attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}
