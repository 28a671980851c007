//! Support for flat JSON resource files.
//!
//! The document must be a single JSON object whose member values are all
//! strings. Nested objects, arrays, numbers, booleans, and nulls are a
//! contract violation; nothing is flattened.

use serde_json::Value;

use crate::{
    error::{Error, ParseErrorKind},
    traits::FormatParser,
    types::ResourceMapping,
};

/// A parsed flat JSON resource file.
///
/// Pair order follows document order (serde_json's `preserve_order`);
/// duplicate keys keep the last occurrence's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    /// All key-value pairs in document order.
    pub pairs: Vec<(String, String)>,
}

impl FormatParser for Format {
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        let value: Value = serde_json::from_reader(reader)
            .map_err(|e| Error::parse(ParseErrorKind::MalformedJson, e.to_string()))?;

        let Value::Object(object) = value else {
            return Err(Error::parse(
                ParseErrorKind::MalformedJson,
                "top-level value is not an object",
            ));
        };

        let mut pairs = Vec::with_capacity(object.len());
        for (key, value) in object {
            match value {
                Value::String(text) => pairs.push((key, text)),
                other => {
                    return Err(Error::parse(
                        ParseErrorKind::MalformedJson,
                        format!("value for key `{key}` is not a string (found {other})"),
                    ));
                }
            }
        }

        Ok(Format { pairs })
    }

    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        let object: serde_json::Map<String, Value> = self
            .pairs
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        serde_json::to_writer_pretty(writer, &Value::Object(object)).map_err(Error::Serialize)
    }
}

impl From<Format> for ResourceMapping {
    fn from(value: Format) -> Self {
        value.pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_object_in_document_order() {
        let parsed = Format::from_str(r#"{"zeta":"last letter","alpha":"first letter"}"#).unwrap();
        assert_eq!(
            parsed.pairs,
            vec![
                ("zeta".to_string(), "last letter".to_string()),
                ("alpha".to_string(), "first letter".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_object_value_is_malformed() {
        let error = Format::from_str(r#"{"a":"x","b":{"c":1}}"#).unwrap_err();
        assert_eq!(error.parse_kind(), Some(ParseErrorKind::MalformedJson));
        assert!(error.to_string().contains("`b`"));
    }

    #[test]
    fn test_non_string_scalar_values_are_malformed() {
        for doc in [
            r#"{"n":1}"#,
            r#"{"b":true}"#,
            r#"{"x":null}"#,
            r#"{"l":["a"]}"#,
        ] {
            let error = Format::from_str(doc).unwrap_err();
            assert_eq!(error.parse_kind(), Some(ParseErrorKind::MalformedJson));
        }
    }

    #[test]
    fn test_top_level_array_is_malformed() {
        let error = Format::from_str(r#"["a","b"]"#).unwrap_err();
        assert_eq!(error.parse_kind(), Some(ParseErrorKind::MalformedJson));
    }

    #[test]
    fn test_syntax_error_is_malformed() {
        let error = Format::from_str("{ not json }").unwrap_err();
        assert_eq!(error.parse_kind(), Some(ParseErrorKind::MalformedJson));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let parsed = Format::from_str(r#"{"a":"first","a":"second"}"#).unwrap();
        let mapping = ResourceMapping::from(parsed);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("a"), Some("second"));
    }

    #[test]
    fn test_unicode_escapes_decoded() {
        let parsed = Format::from_str(r#"{"greeting":"café 😀"}"#).unwrap();
        assert_eq!(parsed.pairs[0].1, "café 😀");
    }

    #[test]
    fn test_round_trip_serialization() {
        let original = Format {
            pairs: vec![
                ("plain".to_string(), "value".to_string()),
                ("quoted".to_string(), "say \"hi\"".to_string()),
                ("multi".to_string(), "line one\nline two".to_string()),
            ],
        };
        let text = original.to_text().unwrap();
        let reparsed = Format::from_str(&text).unwrap();
        assert_eq!(original.pairs, reparsed.pairs);
    }
}
