//! Runtime kind classification for untyped source values.
//!
//! Source data reaches the engine as [`serde_json::Value`]; type checks are
//! structural matches on the value's [`ValueKind`]. Numbers are split into
//! integer and float kinds, which JSON itself does not distinguish.

use std::fmt;

use serde_json::Value;

/// The runtime kind of an untyped source value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a source value.
    ///
    /// A number is [`ValueKind::Int`] when it is representable as an
    /// integer (`i64` or `u64`), [`ValueKind::Float`] otherwise.
    pub fn of(value: &Value) -> ValueKind {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    ValueKind::Int
                } else {
                    ValueKind::Float
                }
            }
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Kind name as used in diagnostic messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_classification() {
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Bool);
        assert_eq!(ValueKind::of(&json!("x")), ValueKind::String);
        assert_eq!(ValueKind::of(&json!([1, 2])), ValueKind::Array);
        assert_eq!(ValueKind::of(&json!({ "a": 1 })), ValueKind::Object);
    }

    #[test]
    fn test_number_kinds() {
        assert_eq!(ValueKind::of(&json!(1)), ValueKind::Int);
        assert_eq!(ValueKind::of(&json!(-7)), ValueKind::Int);
        assert_eq!(ValueKind::of(&json!(u64::MAX)), ValueKind::Int);
        assert_eq!(ValueKind::of(&json!(1.2)), ValueKind::Float);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ValueKind::Float.to_string(), "float");
        assert_eq!(ValueKind::Object.to_string(), "object");
    }
}
