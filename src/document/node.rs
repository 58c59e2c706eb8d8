//! JSON value representation.
//!
//! This module provides the core data structures for representing JSON
//! documents in jsonforge. Objects are insertion-ordered maps: key order is
//! part of the document and survives every mutation, including renames.
//!
//! # Example
//!
//! ```
//! use jsonforge::document::node::{JsonNumber, JsonValue};
//! use indexmap::IndexMap;
//!
//! let mut map = IndexMap::new();
//! map.insert("name".to_string(), JsonValue::String("jsonforge".to_string()));
//! map.insert("version".to_string(), JsonValue::Number(JsonNumber::Integer(1)));
//! let object = JsonValue::Object(map);
//!
//! assert!(object.is_object());
//! assert!(object.is_container());
//! ```

use indexmap::IndexMap;

/// A JSON number, keeping the integer/float distinction from the source text.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonNumber {
    Integer(i64),
    Float(f64),
}

impl std::fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonNumber::Integer(i) => write!(f, "{}", i),
            JsonNumber::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl JsonNumber {
    pub fn as_f64(&self) -> f64 {
        match self {
            JsonNumber::Integer(i) => *i as f64,
            JsonNumber::Float(f) => *f,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, JsonNumber::Integer(_))
    }
}

/// A JSON value.
///
/// Objects preserve insertion order via [`IndexMap`]; cloning a value is a
/// deep copy, which is what move and snapshot semantics rely on.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// An object containing ordered key-value pairs.
    Object(IndexMap<String, JsonValue>),
    /// An array containing ordered values.
    Array(Vec<JsonValue>),
    /// A string.
    String(String),
    /// A number (integer or float).
    Number(JsonNumber),
    /// A boolean.
    Boolean(bool),
    /// Null.
    Null,
}

impl JsonValue {
    /// Creates an empty object value.
    pub fn empty_object() -> Self {
        JsonValue::Object(IndexMap::new())
    }

    /// Creates an empty array value.
    pub fn empty_array() -> Self {
        JsonValue::Array(Vec::new())
    }

    /// Returns true if this value is an object.
    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    /// Returns true if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    /// Returns true if this value is a container (object or array).
    pub fn is_container(&self) -> bool {
        matches!(self, JsonValue::Object(_) | JsonValue::Array(_))
    }

    /// Returns true for null, boolean, number, and string values.
    pub fn is_primitive(&self) -> bool {
        !self.is_container()
    }

    /// Runtime type tag, for display and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Object(_) => "object",
            JsonValue::Array(_) => "array",
            JsonValue::String(_) => "string",
            JsonValue::Number(_) => "number",
            JsonValue::Boolean(_) => "boolean",
            JsonValue::Null => "null",
        }
    }
}

/// The primitive type selected in a value editor.
///
/// Raw input text is coerced to the chosen type; coercion never fails, it
/// falls back the way the value editor does (unparseable number becomes 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Null,
    Boolean,
    Number,
    String,
}

impl ValueType {
    /// Coerces raw input text into a value of this type.
    ///
    /// - `Null` ignores the input and produces null
    /// - `Boolean` produces true only for the exact text "true"
    /// - `Number` parses an integer first, then a float, then defaults to 0
    /// - `String` takes the text as-is
    ///
    /// # Example
    ///
    /// ```
    /// use jsonforge::document::node::{JsonNumber, JsonValue, ValueType};
    ///
    /// assert_eq!(
    ///     ValueType::Number.coerce("4.5"),
    ///     JsonValue::Number(JsonNumber::Float(4.5))
    /// );
    /// assert_eq!(
    ///     ValueType::Number.coerce("not a number"),
    ///     JsonValue::Number(JsonNumber::Integer(0))
    /// );
    /// assert_eq!(ValueType::Boolean.coerce("true"), JsonValue::Boolean(true));
    /// ```
    pub fn coerce(&self, raw: &str) -> JsonValue {
        match self {
            ValueType::Null => JsonValue::Null,
            ValueType::Boolean => JsonValue::Boolean(raw.trim() == "true"),
            ValueType::Number => {
                let trimmed = raw.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    JsonValue::Number(JsonNumber::Integer(i))
                } else if let Ok(f) = trimmed.parse::<f64>() {
                    JsonValue::Number(JsonNumber::Float(f))
                } else {
                    JsonValue::Number(JsonNumber::Integer(0))
                }
            }
            ValueType::String => JsonValue::String(raw.to_string()),
        }
    }
}
