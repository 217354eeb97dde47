//! Repair of strings mangled into character maps
//!
//! Some preview producers serialize string values inside property deltas as
//! objects keyed by character index, so `"foo"` arrives as
//! `{"0": "f", "1": "o", "2": "o"}`. [`repair`] recognizes exactly that shape
//! and joins it back into the original string. It is applied to each value at
//! the point it is inspected or printed, never to the whole tree up front.

use std::borrow::Cow;

use serde_json::Value;

/// Undo the character-map encoding of a string, or return `value` untouched
///
/// A value is only rewritten when it is a non-empty object whose keys are
/// exactly `"0"` to `"n-1"` and every entry is a single-character string.
pub fn repair(value: &Value) -> Cow<'_, Value> {
    let Value::Object(map) = value else {
        return Cow::Borrowed(value);
    };

    if map.is_empty() {
        return Cow::Borrowed(value);
    }

    let mut repaired = String::with_capacity(map.len());
    for index in 0..map.len() {
        match map.get(&index.to_string()) {
            Some(Value::String(ch)) if ch.chars().count() == 1 => repaired.push_str(ch),
            _ => return Cow::Borrowed(value),
        }
    }

    Cow::Owned(Value::String(repaired))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repairs_character_map() {
        let value = json!({ "0": "f", "1": "o", "2": "o" });
        assert_eq!(repair(&value).into_owned(), json!("foo"));
    }

    #[test]
    fn test_repairs_regardless_of_key_order() {
        let value = json!({ "2": "c", "0": "a", "1": "b" });
        assert_eq!(repair(&value).into_owned(), json!("abc"));
    }

    #[test]
    fn test_leaves_other_values_untouched() {
        let cases = vec![
            json!(null),
            json!("foo"),
            json!(12),
            json!({}),
            json!([]),
            json!(["f", "o"]),
            // Non-contiguous indices
            json!({ "0": "a", "2": "b" }),
            // Multi-character entries
            json!({ "0": "ab", "1": "c" }),
            // Non-string entries
            json!({ "0": 1 }),
            // Extra non-index keys
            json!({ "0": "a", "name": "b" }),
        ];

        for value in cases {
            assert!(matches!(repair(&value), Cow::Borrowed(_)), "{}", value);
        }
    }

    #[test]
    fn test_repair_is_idempotent() {
        let values = vec![
            json!({ "0": "y", "1": " ", "2": "u" }),
            json!({ "0": "a", "2": "b" }),
            json!({ "nested": { "0": "x" } }),
            json!("plain"),
        ];

        for value in values {
            let once = repair(&value).into_owned();
            let twice = repair(&once).into_owned();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_multibyte_characters() {
        let value = json!({ "0": "é", "1": "✓" });
        assert_eq!(repair(&value).into_owned(), json!("é✓"));
    }
}
