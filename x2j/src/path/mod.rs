//! Location path compilation and resolution against markup nodes.
//!
//! Paths are compiled on every call; the schema engine evaluates each path
//! string once per resolved value, so no compiled form is cached.
//!
//! # Examples
//!
//! ```text
//! /Shipments/Shipment/@key         attribute of an absolute element path
//! //Line[2]/Item                    second Line under each parent, then its Items
//! Item[@id='I1']/text()             relative path with an attribute predicate
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{Axis, LocationPath, NodeTest, Predicate, Step};
pub use error::PathError;
pub use evaluator::{node_string_value, Evaluator, Item};
pub use parser::Parser;

use crate::error::{ErrorKind, X2jError};
use roxmltree::Node;

/// Compile a path, reporting failures as a path evaluation error.
pub fn compile(path: &str) -> Result<LocationPath, X2jError> {
    Parser::parse(path)
        .map_err(|err| X2jError::new(ErrorKind::PathEvaluation, format!("'{path}': {err}")))
}

/// Every item selected by `path`, in document order.
pub fn resolve_node_set<'a, 'input>(
    context: Node<'a, 'input>,
    path: &str,
) -> Result<Vec<Item<'a, 'input>>, X2jError> {
    let compiled = compile(path)?;
    Ok(Evaluator::new(context).evaluate(&compiled))
}

/// Value of the first attribute (or text node) selected by `path`, empty if none.
pub fn resolve_attribute(context: Node<'_, '_>, path: &str) -> Result<String, X2jError> {
    let items = resolve_node_set(context, path)?;
    match items.first() {
        None => Ok(String::new()),
        Some(Item::Node(node)) if node.is_element() => Err(X2jError::new(
            ErrorKind::AttributeResolution,
            format!("'{path}' selects element <{}>", node.tag_name().name()),
        )),
        Some(item) => Ok(item.string_value()),
    }
}

/// First element selected by `path`.
pub fn resolve_element<'a, 'input>(
    context: Node<'a, 'input>,
    path: &str,
) -> Result<Option<Node<'a, 'input>>, X2jError> {
    let items = resolve_node_set(context, path)?;
    match items.first() {
        None => Ok(None),
        Some(Item::Node(node)) if node.is_element() => Ok(Some(*node)),
        Some(_) => Err(X2jError::new(
            ErrorKind::ElementResolution,
            format!("'{path}' does not select an element"),
        )),
    }
}

/// True when `text` looks like a path (contains `/`, `@` or `[`) and compiles.
///
/// Plain words such as `abcd` compile as relative paths but are treated as
/// literals by the operators, which is why the marker check comes first.
pub fn is_valid_path(text: &str) -> bool {
    let has_marker = text.contains('/') || text.contains('@') || text.contains('[');
    has_marker && Parser::parse(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DOC: &str = r#"<A><B C="x">y</B><D><E/></D></A>"#;

    #[test]
    fn resolves_attribute_and_element() {
        let doc = roxmltree::Document::parse(DOC).unwrap();
        let root = doc.root_element();
        assert_eq!(resolve_attribute(root, "/A/B/@C").unwrap(), "x");
        assert_eq!(resolve_attribute(root, "/A/B/@missing").unwrap(), "");
        let b = resolve_element(root, "/A/B").unwrap().unwrap();
        assert_eq!(b.text(), Some("y"));
        assert!(resolve_element(root, "/A/Z").unwrap().is_none());
    }

    #[test]
    fn resolve_attribute_rejects_elements() {
        let doc = roxmltree::Document::parse(DOC).unwrap();
        let err = resolve_attribute(doc.root_element(), "/A/D").unwrap_err();
        assert_eq!(err.kind, ErrorKind::AttributeResolution);
    }

    #[test]
    fn resolve_element_rejects_attributes() {
        let doc = roxmltree::Document::parse(DOC).unwrap();
        let err = resolve_element(doc.root_element(), "/A/B/@C").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ElementResolution);
    }

    #[test]
    fn compile_failures_are_path_errors() {
        let doc = roxmltree::Document::parse(DOC).unwrap();
        let root = doc.root_element();
        for path in ["/A/#", "/A[", ""] {
            assert_eq!(
                resolve_node_set(root, path).unwrap_err().kind,
                ErrorKind::PathEvaluation
            );
            assert_eq!(
                resolve_attribute(root, path).unwrap_err().kind,
                ErrorKind::PathEvaluation
            );
            assert_eq!(
                resolve_element(root, path).unwrap_err().kind,
                ErrorKind::PathEvaluation
            );
        }
    }

    #[test]
    fn validates_path_shape() {
        assert!(!is_valid_path("abcd"));
        assert!(is_valid_path("/MyShipments/Shipment"));
        assert!(is_valid_path("/MyShipments/Shipment/@Shipment_Key"));
        assert!(is_valid_path("Item[2]"));
        assert!(!is_valid_path(""));
        assert!(!is_valid_path("/MyShipments/Shipment/#@Shipment_Key"));
        assert!(!is_valid_path("-"));
    }

    proptest! {
        #[test]
        fn words_without_markers_are_never_paths(word in "[A-Za-z0-9_ -]{0,24}") {
            prop_assert!(!is_valid_path(&word));
        }

        #[test]
        fn validation_never_panics(text in "\\PC{0,40}") {
            let _ = is_valid_path(&text);
        }
    }
}
