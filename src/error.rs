//! All error types for the langlift crate.
//!
//! Every fallible operation in the pipeline returns one of these values.
//! Parse and validation failures are deterministic functions of the input,
//! so nothing here is retried internally.

use thiserror::Error;

/// Classifies which declared format failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The input does not conform to the Java properties grammar.
    MalformedProperties,
    /// The input is not a flat JSON object of string values.
    MalformedJson,
    /// The input is not a parsable ECMAScript program.
    MalformedScript,
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::MalformedProperties => write!(f, "properties"),
            ParseErrorKind::MalformedJson => write!(f, "JSON"),
            ParseErrorKind::MalformedScript => write!(f, "script"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("{kind} parse error: {message}")]
    Parse {
        kind: ParseErrorKind,
        message: String,
    },

    #[error("resource file has more than {limit} entries")]
    TooManyEntries { limit: usize },

    #[error("keys do not match the resource key pattern: {}", .keys.join(", "))]
    InvalidKeyPattern { keys: Vec<String> },

    #[error("keys longer than {limit} characters: {}", .keys.join(", "))]
    KeyTooLong { limit: usize, keys: Vec<String> },

    #[error("values longer than {limit} characters, for keys: {}", .keys.join(", "))]
    ValueTooLong { limit: usize, keys: Vec<String> },

    #[error("resource file contains no entries")]
    EmptyMapping,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Creates a classified parse error.
    pub fn parse(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Error::Parse {
            kind,
            message: message.into(),
        }
    }

    /// Returns the parse classification, if this is a parse error.
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            Error::Parse { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
