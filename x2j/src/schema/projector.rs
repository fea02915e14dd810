//! Schema projection
//!
//! Walks the schema depth-first and builds a fresh output tree: objects and
//! arrays keep their shape, operator strings are replaced by the values they
//! resolve to, and recurrent templates are expanded per matched node.
//!
//! ```text
//! schema                                          markup
//! [{ "recurrent_path": "/A/Item",                 <A><Item id="1"/><Item id="2"/></A>
//!    "Id": "RECUR_ELEM(/@id)" }]
//!
//! clone 1: { "Id": "XPATH(/A/Item[1]/@id)" }  ->  { "Id": "1" }
//! clone 2: { "Id": "XPATH(/A/Item[2]/@id)" }  ->  { "Id": "2" }
//! ```

use super::{TypeSuffix, RECURRENT_PATH, RECUR_ELEM};
use crate::error::X2jError;
use crate::operators::{self, classify, split_call, OperatorKind};
use crate::path::resolve_node_set;
use roxmltree::Node;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Project `schema` against the markup rooted at `root`.
pub fn project(schema: &Value, root: Node<'_, '_>) -> Result<Value, X2jError> {
    Projector::new(root).project_value(schema)
}

/// Resolves schema nodes against a fixed conversion root.
pub struct Projector<'a, 'input> {
    root: Node<'a, 'input>,
}

impl<'a, 'input> Projector<'a, 'input> {
    pub fn new(root: Node<'a, 'input>) -> Self {
        Self { root }
    }

    pub fn project_value(&self, schema: &Value) -> Result<Value, X2jError> {
        match schema {
            Value::Object(map) => self.project_object(map).map(Value::Object),
            Value::Array(items) => self.project_array(items).map(Value::Array),
            Value::String(raw) => self.project_string(raw),
            other => Ok(other.clone()),
        }
    }

    pub fn project_object(&self, schema: &Map<String, Value>) -> Result<Map<String, Value>, X2jError> {
        let mut output = Map::with_capacity(schema.len());
        for (key, value) in schema {
            output.insert(key.clone(), self.project_value(value)?);
        }
        Ok(output)
    }

    pub fn project_array(&self, items: &[Value]) -> Result<Vec<Value>, X2jError> {
        if let Some((template, loop_path)) = recurrent_template(items) {
            return self.expand_recurrent(template, loop_path);
        }
        items.iter().map(|item| self.project_value(item)).collect()
    }

    /// One projected clone of `template` per node matched by `loop_path`.
    pub fn expand_recurrent(
        &self,
        template: &Map<String, Value>,
        loop_path: &str,
    ) -> Result<Vec<Value>, X2jError> {
        let loop_path = loop_path.trim();
        let matched = resolve_node_set(self.root, loop_path)?;
        debug!(loop_path, count = matched.len(), "expanding recurrent template");

        let mut output = Vec::with_capacity(matched.len());
        for position in 1..=matched.len() {
            let mut clone: Map<String, Value> = template
                .iter()
                .filter(|(key, _)| key.as_str() != RECURRENT_PATH)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            for value in clone.values_mut() {
                rewrite_markers(value, loop_path, position)?;
            }
            output.push(Value::Object(self.project_object(&clone)?));
        }
        Ok(output)
    }

    fn project_string(&self, raw: &str) -> Result<Value, X2jError> {
        if raw.trim().is_empty() {
            return Ok(Value::String(raw.to_string()));
        }
        if classify(raw) == OperatorKind::Literal {
            if raw.starts_with(RECUR_ELEM) {
                warn!(value = raw, "RECUR_ELEM outside a recurrent template is kept as a literal");
            }
            return Ok(Value::String(raw.to_string()));
        }
        let resolved = operators::resolve(raw, self.root)?;
        TypeSuffix::of(raw).coerce(resolved)
    }
}

/// The template and loop path when `items` is a sole object with a non-blank `recurrent_path`.
fn recurrent_template(items: &[Value]) -> Option<(&Map<String, Value>, &str)> {
    let [Value::Object(template)] = items else {
        return None;
    };
    match template.get(RECURRENT_PATH) {
        Some(Value::String(path)) if !path.trim().is_empty() => Some((template, path.as_str())),
        _ => None,
    }
}

/// Rewrite `RECUR_ELEM(p)suffix` to `XPATH(<loop_path>[position]p)suffix`.
///
/// Nested recurrent templates keep their own markers; only their loop path is
/// anchored to the current node.
fn rewrite_markers(value: &mut Value, loop_path: &str, position: usize) -> Result<(), X2jError> {
    match value {
        Value::String(raw) if raw.starts_with(RECUR_ELEM) => {
            let (inner, suffix) = split_call(raw)?;
            let rewritten = format!("XPATH({loop_path}[{position}]{inner}){suffix}");
            *raw = rewritten;
        }
        Value::Array(items) if recurrent_template(items.as_slice()).is_some() => {
            if let Some(Value::Object(template)) = items.first_mut() {
                anchor_loop_path(template, loop_path, position)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_markers(item, loop_path, position)?;
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                rewrite_markers(item, loop_path, position)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn anchor_loop_path(
    template: &mut Map<String, Value>,
    loop_path: &str,
    position: usize,
) -> Result<(), X2jError> {
    if let Some(Value::String(inner_loop)) = template.get_mut(RECURRENT_PATH) {
        if inner_loop.starts_with(RECUR_ELEM) {
            let (inner, _) = split_call(inner_loop)?;
            let anchored = format!("{loop_path}[{position}]{inner}");
            *inner_loop = anchored;
        }
    }
    Ok(())
}
