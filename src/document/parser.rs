//! Import and export of JSON text.
//!
//! Importing goes through serde_json and enforces the document contract: the
//! root of an editable document must be an object or an array. Parse errors
//! carry the serde_json message verbatim so the UI can show exactly what the
//! parser complained about.
//!
//! # Example
//!
//! ```
//! use jsonforge::document::parser::{parse_document, to_json_string};
//!
//! let tree = parse_document(r#"{"name": "Ana", "age": 30}"#).unwrap();
//! let text = to_json_string(&tree);
//! assert!(text.contains("\"name\": \"Ana\""));
//! ```

use serde_json::Value as SerdeValue;

use super::node::{JsonNumber, JsonValue};
use super::tree::JsonTree;
use crate::error::EditError;

/// Parses JSON text into a document tree.
///
/// Fails with `Parse` for malformed JSON and with `Validation` when the root
/// is a primitive: `"just a string"` is valid JSON but not a valid document.
pub fn parse_document(text: &str) -> Result<JsonTree, EditError> {
    let value: SerdeValue =
        serde_json::from_str(text).map_err(|e| EditError::Parse(e.to_string()))?;

    if !matches!(value, SerdeValue::Object(_) | SerdeValue::Array(_)) {
        return Err(EditError::Validation(
            "The JSON root must be an object or array".to_string(),
        ));
    }

    Ok(JsonTree::new(convert_value(&value)))
}

/// Converts a serde_json value into the internal representation.
///
/// Object key order is preserved (serde_json is built with `preserve_order`).
pub fn convert_value(value: &SerdeValue) -> JsonValue {
    match value {
        SerdeValue::Null => JsonValue::Null,
        SerdeValue::Bool(b) => JsonValue::Boolean(*b),
        SerdeValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::Number(JsonNumber::Integer(i))
            } else {
                JsonValue::Number(JsonNumber::Float(n.as_f64().unwrap_or(0.0)))
            }
        }
        SerdeValue::String(s) => JsonValue::String(s.clone()),
        SerdeValue::Array(elements) => {
            JsonValue::Array(elements.iter().map(convert_value).collect())
        }
        SerdeValue::Object(entries) => {
            let mut map = indexmap::IndexMap::with_capacity(entries.len());
            for (key, value) in entries {
                map.insert(key.clone(), convert_value(value));
            }
            JsonValue::Object(map)
        }
    }
}

/// Converts an internal value back into a serde_json value for serialization.
pub fn to_serde_value(value: &JsonValue) -> SerdeValue {
    match value {
        JsonValue::Null => SerdeValue::Null,
        JsonValue::Boolean(b) => SerdeValue::Bool(*b),
        JsonValue::Number(JsonNumber::Integer(i)) => SerdeValue::Number((*i).into()),
        JsonValue::Number(JsonNumber::Float(f)) => serde_json::Number::from_f64(*f)
            .map(SerdeValue::Number)
            .unwrap_or(SerdeValue::Null),
        JsonValue::String(s) => SerdeValue::String(s.clone()),
        JsonValue::Array(elements) => {
            SerdeValue::Array(elements.iter().map(to_serde_value).collect())
        }
        JsonValue::Object(entries) => {
            let mut map = serde_json::Map::with_capacity(entries.len());
            for (key, value) in entries {
                map.insert(key.clone(), to_serde_value(value));
            }
            SerdeValue::Object(map)
        }
    }
}

/// Serializes a tree to pretty-printed JSON with 2-space indentation.
pub fn to_json_string(tree: &JsonTree) -> String {
    // to_string_pretty cannot fail for a tree built from these value types.
    serde_json::to_string_pretty(&to_serde_value(tree.root()))
        .unwrap_or_else(|_| "null".to_string())
}

/// Serializes a tree with a caller-chosen indentation width.
pub fn to_json_string_indented(tree: &JsonTree, indent_size: usize) -> String {
    use serde::Serialize;

    let indent = " ".repeat(indent_size);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut output = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut output, formatter);
    if to_serde_value(tree.root())
        .serialize(&mut serializer)
        .is_err()
    {
        return "null".to_string();
    }
    String::from_utf8(output).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_preserves_key_order() {
        let tree = parse_document(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        if let JsonValue::Object(entries) = tree.root() {
            let keys: Vec<&String> = entries.keys().collect();
            assert_eq!(keys, vec!["z", "a", "m"]);
        } else {
            panic!("expected object root");
        }
    }

    #[test]
    fn test_parse_rejects_primitive_root() {
        let result = parse_document("\"just a string\"");
        assert!(matches!(result, Err(EditError::Validation(_))));

        let result = parse_document("42");
        assert!(matches!(result, Err(EditError::Validation(_))));
    }

    #[test]
    fn test_parse_accepts_array_root() {
        let tree = parse_document("[1, 2, 3]").unwrap();
        assert!(tree.root().is_array());
    }

    #[test]
    fn test_parse_error_is_verbatim() {
        let broken = "{\"a\": }";
        let expected = serde_json::from_str::<SerdeValue>(broken)
            .unwrap_err()
            .to_string();
        match parse_document(broken) {
            Err(EditError::Parse(msg)) => assert_eq!(msg, expected),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_serialize_two_space_indent() {
        let tree = parse_document(r#"{"a": [1, 2]}"#).unwrap();
        let text = to_json_string(&tree);
        assert_eq!(text, "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn test_number_round_trip() {
        let tree = parse_document(r#"{"i": 7, "f": 1.5}"#).unwrap();
        let text = to_json_string(&tree);
        assert!(text.contains("\"i\": 7"));
        assert!(text.contains("\"f\": 1.5"));
    }
}
