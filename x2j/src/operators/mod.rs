//! Value operators
//!
//! A schema string either carries an operator keyword, `KEYWORD(argument)`
//! optionally followed by a type suffix, or is a literal. [`classify`] picks the
//! operator by keyword prefix and [`resolve`] maps each kind to its resolver.
//!
//! | Keyword   | Kind            | Result                                         |
//! |-----------|-----------------|------------------------------------------------|
//! | `XPATH(`  | DirectPath      | attribute value, first text child or first child element |
//! | `VALUE(`  | ResolvedValue   | trimmed text, or serialized child elements     |
//! | `CONCAT(` | Concatenate     | comma-separated operands joined                |
//! | `LEN(`    | Length          | character count of the operand                 |
//! | `UPPER(`  | UpperCase       | operand upper-cased                            |
//! | `LOWER(`  | LowerCase       | operand lower-cased                            |
//! | `SUBSTR(` | Substring       | inclusive character slice `[start, end]`       |
//! | (none)    | Literal         | the raw string                                 |
//!
//! Values read from markup are entity-encoded. Operands of the string
//! operators resolve through [`resolve_operand`]: a nested operator, a bare
//! path (resolved like `VALUE`), or verbatim literal text.

mod path;
mod text;

pub use path::{direct_path, resolved_value};

use crate::error::{ErrorKind, X2jError};
use crate::path::is_valid_path;
use roxmltree::Node;
use tracing::trace;

/// Operator selected by a schema string's keyword prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Literal,
    DirectPath,
    ResolvedValue,
    Concatenate,
    Length,
    UpperCase,
    LowerCase,
    Substring,
}

const KEYWORDS: &[(&str, OperatorKind)] = &[
    ("XPATH(", OperatorKind::DirectPath),
    ("VALUE(", OperatorKind::ResolvedValue),
    ("CONCAT(", OperatorKind::Concatenate),
    ("LEN(", OperatorKind::Length),
    ("UPPER(", OperatorKind::UpperCase),
    ("LOWER(", OperatorKind::LowerCase),
    ("SUBSTR(", OperatorKind::Substring),
];

/// Classify a raw schema string by its longest matching keyword prefix.
pub fn classify(raw: &str) -> OperatorKind {
    KEYWORDS
        .iter()
        .filter(|(keyword, _)| raw.starts_with(keyword))
        .max_by_key(|(keyword, _)| keyword.len())
        .map_or(OperatorKind::Literal, |(_, kind)| *kind)
}

/// Argument and trailing suffix of an operator-encoded string.
///
/// The argument runs from the first `(` to the last `)`; whatever follows the
/// last `)` is the suffix (for example `:INT`).
pub fn split_call(raw: &str) -> Result<(&str, &str), X2jError> {
    let open = raw.find('(');
    let close = raw.rfind(')');
    match (open, close) {
        (Some(open), Some(close)) if close > open => Ok((&raw[open + 1..close], &raw[close + 1..])),
        _ => Err(X2jError::new(
            ErrorKind::StringOperation,
            format!("'{raw}' is missing its closing parenthesis"),
        )),
    }
}

/// Resolve a schema string against the context node.
pub fn resolve(raw: &str, context: Node<'_, '_>) -> Result<String, X2jError> {
    let kind = classify(raw);
    if kind == OperatorKind::Literal {
        return Ok(raw.to_string());
    }

    let (argument, _) = split_call(raw)?;
    let value = match kind {
        OperatorKind::Literal => raw.to_string(),
        OperatorKind::DirectPath => path::direct_path(context, argument)?,
        OperatorKind::ResolvedValue => path::resolved_value(context, argument)?,
        OperatorKind::Concatenate => text::concatenate(argument, context)?,
        OperatorKind::Length => text::length(argument, context)?,
        OperatorKind::UpperCase => text::upper_case(argument, context)?,
        OperatorKind::LowerCase => text::lower_case(argument, context)?,
        OperatorKind::Substring => text::substring(argument, context)?,
    };
    trace!(?kind, raw, value = value.as_str(), "resolved operator");
    Ok(value)
}

/// Resolve an operand of a string operator.
pub fn resolve_operand(operand: &str, context: Node<'_, '_>) -> Result<String, X2jError> {
    let trimmed = operand.trim();
    if classify(trimmed) != OperatorKind::Literal {
        resolve(trimmed, context)
    } else if is_valid_path(trimmed) {
        path::resolved_value(context, trimmed)
    } else {
        Ok(operand.to_string())
    }
}
