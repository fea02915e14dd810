//! Error types for location path compilation.

use thiserror::Error;

/// Errors that can occur while compiling a location path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Unexpected token '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        position: usize,
        found: String,
        expected: String,
    },
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },
    #[error("Invalid location path: {message}")]
    InvalidSyntax { message: String },
}
