//! String operators: `CONCAT`, `LEN`, `UPPER`, `LOWER` and `SUBSTR`.

use super::resolve_operand;
use crate::error::{ErrorKind, X2jError};
use roxmltree::Node;

/// Placeholder for a literal comma inside `CONCAT` operands.
pub const COMMA_PLACEHOLDER: &str = "${COMMA}";

/// Split operator arguments on commas outside nested parentheses.
fn split_arguments(argument: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, ch) in argument.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&argument[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&argument[start..]);
    parts
}

pub fn concatenate(argument: &str, context: Node<'_, '_>) -> Result<String, X2jError> {
    let mut value = String::new();
    for operand in split_arguments(argument) {
        value.push_str(&resolve_operand(operand, context)?);
    }
    Ok(value.replace(COMMA_PLACEHOLDER, ","))
}

pub fn length(argument: &str, context: Node<'_, '_>) -> Result<String, X2jError> {
    Ok(resolve_operand(argument, context)?.chars().count().to_string())
}

pub fn upper_case(argument: &str, context: Node<'_, '_>) -> Result<String, X2jError> {
    Ok(resolve_operand(argument, context)?.to_uppercase())
}

pub fn lower_case(argument: &str, context: Node<'_, '_>) -> Result<String, X2jError> {
    Ok(resolve_operand(argument, context)?.to_lowercase())
}

/// Inclusive character slice `[start, end]` of the first operand.
pub fn substring(argument: &str, context: Node<'_, '_>) -> Result<String, X2jError> {
    let parts = split_arguments(argument);
    let text = resolve_operand(parts[0], context)?;
    if text.trim().is_empty() {
        return Ok(String::new());
    }

    let [_, start, end] = parts.as_slice() else {
        return Err(X2jError::new(
            ErrorKind::StringOperation,
            format!("SUBSTR expects 3 arguments, got {}", parts.len()),
        ));
    };
    let start = parse_bound(start)?;
    let end = parse_bound(end)?;
    let length = text.chars().count();
    if start > end || end >= length {
        return Err(X2jError::new(
            ErrorKind::StringOperation,
            format!("bounds {start}..={end} are outside '{text}' (length {length})"),
        ));
    }

    Ok(text.chars().skip(start).take(end - start + 1).collect())
}

fn parse_bound(raw: &str) -> Result<usize, X2jError> {
    raw.trim().parse::<usize>().map_err(|_| {
        X2jError::new(
            ErrorKind::StringOperation,
            format!("'{}' is not a valid index", raw.trim()),
        )
    })
}
