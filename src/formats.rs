//! All supported resource file formats.
//!
//! Each format module provides a `Format` struct implementing
//! [`FormatParser`](crate::traits::FormatParser), plus a conversion into the
//! canonical [`ResourceMapping`](crate::types::ResourceMapping). The
//! [`SourceFormat`] enum selects which parser runs for an upload.

pub mod json;
pub mod properties;
pub mod script;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

pub use json::Format as JsonFormat;
pub use properties::Format as PropertiesFormat;
pub use script::Format as ScriptFormat;

use crate::Error;

/// The declared format of an uploaded resource file.
///
/// Selected once per upload from the request's format token and immutable
/// from then on; extraction dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Java `key=value` properties files.
    Properties,
    /// A flat JSON object of string values.
    Json,
    /// An AMD-style script module of string-literal pairs.
    Script,
}

impl Display for SourceFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Properties => write!(f, "properties"),
            SourceFormat::Json => write!(f, "json"),
            SourceFormat::Script => write!(f, "js"),
        }
    }
}

/// Accepts the case-insensitive tokens `"properties"`, `"json"`, and `"js"`
/// (plus `"javascript"`). Anything else is [`Error::UnknownFormat`]; callers
/// must resolve the token before extraction runs.
impl FromStr for SourceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "properties" => Ok(SourceFormat::Properties),
            "json" => Ok(SourceFormat::Json),
            "js" | "javascript" => Ok(SourceFormat::Script),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl SourceFormat {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Properties => "properties",
            SourceFormat::Json => "json",
            SourceFormat::Script => "js",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_display() {
        assert_eq!(SourceFormat::Properties.to_string(), "properties");
        assert_eq!(SourceFormat::Json.to_string(), "json");
        assert_eq!(SourceFormat::Script.to_string(), "js");
    }

    #[test]
    fn test_source_format_from_str() {
        assert_eq!(
            SourceFormat::from_str("properties").unwrap(),
            SourceFormat::Properties
        );
        assert_eq!(SourceFormat::from_str("JSON").unwrap(), SourceFormat::Json);
        assert_eq!(SourceFormat::from_str("js").unwrap(), SourceFormat::Script);
        assert_eq!(
            SourceFormat::from_str("JavaScript").unwrap(),
            SourceFormat::Script
        );
    }

    #[test]
    fn test_source_format_from_str_trims_whitespace() {
        assert_eq!(
            SourceFormat::from_str("  properties  ").unwrap(),
            SourceFormat::Properties
        );
    }

    #[test]
    fn test_source_format_from_str_unknown() {
        assert!(matches!(
            SourceFormat::from_str("yaml"),
            Err(Error::UnknownFormat(token)) if token == "yaml"
        ));
        assert!(SourceFormat::from_str("").is_err());
    }

    #[test]
    fn test_source_format_extension() {
        assert_eq!(SourceFormat::Properties.extension(), "properties");
        assert_eq!(SourceFormat::Json.extension(), "json");
        assert_eq!(SourceFormat::Script.extension(), "js");
    }
}
