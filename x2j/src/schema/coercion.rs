//! Type suffixes (`:INT`, `:DBL`, `:BOOL`) on operator strings.

use crate::error::{ErrorKind, X2jError};
use serde_json::{Number, Value};

/// Output type requested by the text after an operator's closing parenthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSuffix {
    Text,
    Integer,
    Double,
    Boolean,
}

impl TypeSuffix {
    /// Suffix of an operator string; markers are matched case-insensitively
    /// in the order `INT`, `DBL`, `BOOL`.
    pub fn of(raw: &str) -> Self {
        let suffix = match raw.rfind(')') {
            Some(close) => raw[close + 1..].to_ascii_uppercase(),
            None => return TypeSuffix::Text,
        };
        if suffix.contains("INT") {
            TypeSuffix::Integer
        } else if suffix.contains("DBL") {
            TypeSuffix::Double
        } else if suffix.contains("BOOL") {
            TypeSuffix::Boolean
        } else {
            TypeSuffix::Text
        }
    }

    /// Convert a resolved value. Blank text fails `INT` and `DBL`.
    pub fn coerce(self, value: String) -> Result<Value, X2jError> {
        let trimmed = value.trim();
        match self {
            TypeSuffix::Text => Ok(Value::String(value)),
            TypeSuffix::Integer => trimmed
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| coercion_error(trimmed, "an integer", e)),
            TypeSuffix::Double => {
                let parsed = trimmed
                    .parse::<f64>()
                    .map_err(|e| coercion_error(trimmed, "a double", e))?;
                Number::from_f64(parsed)
                    .map(Value::Number)
                    .ok_or_else(|| coercion_error(trimmed, "a double", "value is not finite"))
            }
            TypeSuffix::Boolean => Ok(Value::Bool(trimmed.eq_ignore_ascii_case("true"))),
        }
    }
}

fn coercion_error(value: &str, target: &str, cause: impl std::fmt::Display) -> X2jError {
    X2jError::new(
        ErrorKind::ValueCoercion,
        format!("'{value}' is not {target}: {cause}"),
    )
}
