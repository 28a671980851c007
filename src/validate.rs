//! Constraint validation for extracted resource mappings.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::types::ResourceMapping;

lazy_static! {
    /// Anchored full match: keys may only contain letters, digits,
    /// underscores, dots, and hyphens.
    static ref RESOURCE_KEY_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap();
}

/// Configured ceilings for one validation pass.
///
/// Constructed once per pipeline invocation, typically from external
/// configuration (`Deserialize` is derived for that purpose), and immutable
/// for the duration of the pass. There is no process-wide configuration
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Maximum number of entries in one mapping.
    pub max_entry_count: usize,
    /// Maximum key length, in Unicode scalar values.
    pub max_key_length: usize,
    /// Maximum value length, in Unicode scalar values.
    pub max_value_length: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        ValidationLimits {
            max_entry_count: 500,
            max_key_length: 256,
            max_value_length: 2048,
        }
    }
}

/// The complete result of validating one mapping.
///
/// Offending keys are listed in mapping-iteration order, so reports are
/// deterministic and reproducible. A key can appear in both key lists; each
/// list is independently complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// The mapping exceeds the configured entry count.
    pub too_many_entries: bool,
    /// Keys that fail the anchored `[A-Za-z0-9_.-]+` pattern.
    pub invalid_pattern_keys: Vec<String>,
    /// Keys longer than the configured key length.
    pub too_long_keys: Vec<String>,
    /// Keys whose values are longer than the configured value length.
    pub too_long_value_keys: Vec<String>,
}

impl ValidationReport {
    /// Whether the mapping passed every check.
    pub fn is_acceptable(&self) -> bool {
        !self.too_many_entries
            && self.invalid_pattern_keys.is_empty()
            && self.too_long_keys.is_empty()
            && self.too_long_value_keys.is_empty()
    }
}

/// Checks a mapping against the configured limits.
///
/// Pure function over its inputs; computes every check so the report is
/// complete, regardless of which violation class a caller chooses to
/// surface.
pub fn validate(mapping: &ResourceMapping, limits: &ValidationLimits) -> ValidationReport {
    let mut report = ValidationReport {
        too_many_entries: mapping.len() > limits.max_entry_count,
        ..ValidationReport::default()
    };

    for (key, value) in mapping.iter() {
        if !RESOURCE_KEY_PATTERN.is_match(key) {
            report.invalid_pattern_keys.push(key.to_string());
        }
        if key.chars().count() > limits.max_key_length {
            report.too_long_keys.push(key.to_string());
        }
        if value.chars().count() > limits.max_value_length {
            report.too_long_value_keys.push(key.to_string());
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping_of(pairs: &[(&str, &str)]) -> ResourceMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn small_limits() -> ValidationLimits {
        ValidationLimits {
            max_entry_count: 3,
            max_key_length: 8,
            max_value_length: 10,
        }
    }

    #[test]
    fn test_default_limits() {
        let limits = ValidationLimits::default();
        assert_eq!(limits.max_entry_count, 500);
        assert_eq!(limits.max_key_length, 256);
        assert_eq!(limits.max_value_length, 2048);
    }

    #[test]
    fn test_limits_deserialize_with_defaults() {
        let limits: ValidationLimits = serde_json::from_str(r#"{"max_entry_count": 10}"#).unwrap();
        assert_eq!(limits.max_entry_count, 10);
        assert_eq!(limits.max_key_length, 256);
    }

    #[test]
    fn test_acceptable_mapping_produces_empty_report() {
        let report = validate(
            &mapping_of(&[("a.b-c_1", "value"), ("x", "y")]),
            &small_limits(),
        );
        assert!(report.is_acceptable());
        assert_eq!(report, ValidationReport::default());
    }

    #[test]
    fn test_key_pattern_rejects_whitespace_and_punctuation() {
        let report = validate(
            &mapping_of(&[("a b", "v"), ("a/b", "v"), ("a:b", "v"), ("ok", "v")]),
            &ValidationLimits::default(),
        );
        assert_eq!(report.invalid_pattern_keys, vec!["a b", "a/b", "a:b"]);
    }

    #[test]
    fn test_empty_key_fails_pattern() {
        let report = validate(&mapping_of(&[("", "v")]), &ValidationLimits::default());
        assert_eq!(report.invalid_pattern_keys, vec![""]);
    }

    #[test]
    fn test_key_length_is_boundary_exact() {
        let at_limit = "k".repeat(8);
        let over_limit = "k".repeat(9);
        let report = validate(
            &mapping_of(&[(&at_limit, "v"), (&over_limit, "v")]),
            &small_limits(),
        );
        assert_eq!(report.too_long_keys, vec![over_limit]);
    }

    #[test]
    fn test_value_length_is_boundary_exact() {
        let at_limit = "v".repeat(10);
        let over_limit = "v".repeat(11);
        let report = validate(
            &mapping_of(&[("ok", &at_limit), ("bad", &over_limit)]),
            &small_limits(),
        );
        assert_eq!(report.too_long_value_keys, vec!["bad"]);
    }

    #[test]
    fn test_lengths_counted_in_chars_not_bytes() {
        // four scalar values, twelve UTF-8 bytes
        let report = validate(&mapping_of(&[("key", "日本語字")]), &small_limits());
        assert!(report.too_long_value_keys.is_empty());
    }

    #[test]
    fn test_key_can_appear_in_both_key_lists() {
        let bad_key = "has space!".repeat(2);
        let report = validate(&mapping_of(&[(&bad_key, "v")]), &small_limits());
        assert_eq!(report.invalid_pattern_keys, vec![bad_key.clone()]);
        assert_eq!(report.too_long_keys, vec![bad_key]);
    }

    #[test]
    fn test_count_check_does_not_suppress_key_lists() {
        let report = validate(
            &mapping_of(&[("a!", "1"), ("b", "2"), ("c", "3"), ("d", "4")]),
            &small_limits(),
        );
        assert!(report.too_many_entries);
        assert_eq!(report.invalid_pattern_keys, vec!["a!"]);
    }

    #[test]
    fn test_offending_keys_in_mapping_iteration_order() {
        let report = validate(
            &mapping_of(&[("z z", "v"), ("a a", "v"), ("m m", "v")]),
            &ValidationLimits::default(),
        );
        assert_eq!(report.invalid_pattern_keys, vec!["z z", "a a", "m m"]);
    }
}
