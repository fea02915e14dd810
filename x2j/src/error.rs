//! Error types for conversion operations

use std::fmt;
use thiserror::Error;

/// Classification of every failure the conversion pipeline can raise.
///
/// Each kind maps to a stable catalog code (`X2J_ERR_nnn`) so that message text
/// can be overridden without touching the code. All kinds are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The message catalog could not be loaded at startup
    FatalConfiguration,
    /// Markup file could not be read or parsed
    MarkupRead,
    /// Schema file could not be read
    SchemaRead,
    /// Schema text is not valid JSON
    SchemaParse,
    /// A location path failed to compile
    PathEvaluation,
    /// A location path did not address an attribute or text value
    AttributeResolution,
    /// A location path did not address an element
    ElementResolution,
    /// A markup node could not be serialized
    Serialization,
    /// The JSON output could not be written
    Persist,
    /// Markup text is not well-formed
    MarkupParse,
    /// A resolved value could not be coerced to the requested type
    ValueCoercion,
    /// A string operator received invalid arguments
    StringOperation,
}

impl ErrorKind {
    /// Every kind, in catalog order.
    pub const ALL: [ErrorKind; 12] = [
        ErrorKind::FatalConfiguration,
        ErrorKind::MarkupRead,
        ErrorKind::SchemaRead,
        ErrorKind::SchemaParse,
        ErrorKind::PathEvaluation,
        ErrorKind::AttributeResolution,
        ErrorKind::ElementResolution,
        ErrorKind::Serialization,
        ErrorKind::Persist,
        ErrorKind::MarkupParse,
        ErrorKind::ValueCoercion,
        ErrorKind::StringOperation,
    ];

    /// Catalog key for this kind.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::FatalConfiguration => "X2J_ERR_000",
            ErrorKind::MarkupRead => "X2J_ERR_001",
            ErrorKind::SchemaRead => "X2J_ERR_002",
            ErrorKind::SchemaParse => "X2J_ERR_003",
            ErrorKind::PathEvaluation => "X2J_ERR_004",
            ErrorKind::AttributeResolution => "X2J_ERR_005",
            ErrorKind::ElementResolution => "X2J_ERR_006",
            ErrorKind::Serialization => "X2J_ERR_007",
            ErrorKind::Persist => "X2J_ERR_008",
            ErrorKind::MarkupParse => "X2J_ERR_009",
            ErrorKind::ValueCoercion => "X2J_ERR_010",
            ErrorKind::StringOperation => "X2J_ERR_011",
        }
    }

    /// Compiled-in message, used whenever a catalog has no entry for the code.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::FatalConfiguration => "Unable to load the message catalog.",
            ErrorKind::MarkupRead => "Error while reading XML from file.",
            ErrorKind::SchemaRead => "Error while reading JSON from file/string.",
            ErrorKind::SchemaParse => "Error while parsing JSON from file/string.",
            ErrorKind::PathEvaluation => "Error while reading XML data using XPaths.",
            ErrorKind::AttributeResolution => {
                "Error while reading XML attribute value using XPaths."
            }
            ErrorKind::ElementResolution => "Error while reading XML element using XPaths.",
            ErrorKind::Serialization => "Error while converting XML element/document to String.",
            ErrorKind::Persist => "Error while writing JSON to file.",
            ErrorKind::MarkupParse => "Error while parsing XML from String.",
            ErrorKind::ValueCoercion => "Error while converting a value to the requested type.",
            ErrorKind::StringOperation => "Error while performing string operation.",
        }
    }

    /// Look up a kind by its catalog code.
    pub fn from_code(code: &str) -> Option<ErrorKind> {
        ErrorKind::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A terminal conversion failure.
///
/// `detail` carries the context of the failure (offending path, value, file);
/// the human-facing headline comes from the kind, either from a catalog or from
/// [`ErrorKind::default_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} ({detail})", .kind.default_message())]
pub struct X2jError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl X2jError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        X2jError {
            kind,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}
