//! Property-based round-trip coverage: encode then parse recovers the
//! original mapping for every format writer.

use std::collections::BTreeMap;

use langlift::formats::{JsonFormat, PropertiesFormat, ScriptFormat};
use langlift::traits::FormatParser;
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_.-]{0,15}").expect("valid key regex")
}

fn value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _\\-\\.,!\\?:=#]{1,30}").expect("valid value regex")
}

fn dataset_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 1..8)
}

fn pairs_of(values: &BTreeMap<String, String>) -> Vec<(String, String)> {
    values
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn properties_roundtrip_recovers_all_pairs(values in dataset_strategy()) {
        let original = PropertiesFormat { pairs: pairs_of(&values) };
        let text = original.to_text().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let reparsed = PropertiesFormat::from_str(&text)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(original.pairs, reparsed.pairs);
    }

    #[test]
    fn json_roundtrip_recovers_all_pairs(values in dataset_strategy()) {
        let original = JsonFormat { pairs: pairs_of(&values) };
        let text = original.to_text().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let reparsed = JsonFormat::from_str(&text)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(original.pairs, reparsed.pairs);
    }

    #[test]
    fn script_roundtrip_recovers_all_pairs(values in dataset_strategy()) {
        let original = ScriptFormat { pairs: pairs_of(&values) };
        let text = original.to_text().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let reparsed = ScriptFormat::from_str(&text)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(original.pairs, reparsed.pairs);
    }

    #[test]
    fn properties_roundtrip_through_the_filesystem(values in dataset_strategy()) {
        let tmp = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let path = tmp.path().join("bundle.properties");

        let original = PropertiesFormat { pairs: pairs_of(&values) };
        original.write_to(&path).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let reparsed = PropertiesFormat::read_from(&path)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(original.pairs, reparsed.pairs);
    }
}

#[test]
fn properties_roundtrip_with_awkward_characters() {
    let original = PropertiesFormat {
        pairs: vec![
            ("spaced.key".to_string(), "  two leading spaces".to_string()),
            ("unicode".to_string(), "naïve 日本語 😀".to_string()),
            ("specials".to_string(), "a=b:c #d !e \\f".to_string()),
        ],
    };
    let text = original.to_text().unwrap();
    let reparsed = PropertiesFormat::from_str(&text).unwrap();
    assert_eq!(original.pairs, reparsed.pairs);
}
