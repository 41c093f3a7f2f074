//! Schema inference over arbitrary JSON values.
//!
//! Classifies values into JSON type names and derives a structural schema
//! describing objects (per-key), arrays (by first element), and scalars.

use serde_json::{json, Map, Value};
use std::fmt;

/// JSON type classification used by schema inference and validation.
///
/// Integers and floating point numbers are distinguished so that a schema
/// inferred from `{"count": 3}` reports `integer` rather than `number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl TypeTag {
    /// Classify a JSON value.
    ///
    /// Booleans are matched before numbers so `true` never reads as an
    /// integer, and a number is an `Integer` only when the underlying
    /// representation holds a whole value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    TypeTag::Integer
                } else {
                    TypeTag::Number
                }
            }
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Object,
        }
    }

    /// The lowercase type name as it appears in schemas and API responses.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Integer => "integer",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer a structural schema for a JSON value.
///
/// Objects yield `{"type": "object", "properties": {...}}` with one entry
/// per key in the object's own order. Arrays describe their element shape
/// through an `items` schema inferred from the first element; an empty
/// array has no `items` key. Scalars yield `{"type": <name>}`. The same
/// inference recurses at every level of nesting.
pub fn infer_schema(value: &Value) -> Value {
    match value {
        Value::Object(fields) => {
            let mut properties = Map::new();
            for (key, field_value) in fields {
                properties.insert(key.clone(), infer_schema(field_value));
            }
            json!({
                "type": "object",
                "properties": properties,
            })
        }
        Value::Array(items) => match items.first() {
            Some(first) => json!({
                "type": "array",
                "items": infer_schema(first),
            }),
            None => json!({ "type": "array" }),
        },
        scalar => json!({ "type": TypeTag::of(scalar).as_str() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_scalars() {
        assert_eq!(TypeTag::of(&json!(null)), TypeTag::Null);
        assert_eq!(TypeTag::of(&json!(true)), TypeTag::Boolean);
        assert_eq!(TypeTag::of(&json!(42)), TypeTag::Integer);
        assert_eq!(TypeTag::of(&json!(-7)), TypeTag::Integer);
        assert_eq!(TypeTag::of(&json!(2.5)), TypeTag::Number);
        assert_eq!(TypeTag::of(&json!("hi")), TypeTag::String);
        assert_eq!(TypeTag::of(&json!([1])), TypeTag::Array);
        assert_eq!(TypeTag::of(&json!({"a": 1})), TypeTag::Object);
    }

    #[test]
    fn booleans_are_not_integers() {
        assert_eq!(TypeTag::of(&json!(true)).as_str(), "boolean");
        assert_eq!(TypeTag::of(&json!(false)).as_str(), "boolean");
    }

    #[test]
    fn infers_object_with_nested_array() {
        let value = json!({"name": "Alice", "age": 30, "tags": ["x"]});
        let schema = infer_schema(&value);
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "age": {"type": "integer"},
                    "tags": {"type": "array", "items": {"type": "string"}},
                }
            })
        );
    }

    #[test]
    fn object_properties_follow_key_order() {
        let value = json!({"zeta": 1, "alpha": 2});
        let schema = infer_schema(&value);
        let keys: Vec<&String> = schema["properties"]
            .as_object()
            .map(|props| props.keys().collect())
            .unwrap_or_default();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn empty_array_has_no_items() {
        let schema = infer_schema(&json!([]));
        assert_eq!(schema, json!({"type": "array"}));
        assert!(schema.get("items").is_none());
    }

    #[test]
    fn empty_object_has_empty_properties() {
        let schema = infer_schema(&json!({}));
        assert_eq!(schema, json!({"type": "object", "properties": {}}));
    }

    #[test]
    fn array_schema_describes_first_element_only() {
        let schema = infer_schema(&json!([{"a": 1}, {"b": "two"}]));
        assert_eq!(
            schema,
            json!({
                "type": "array",
                "items": {"type": "object", "properties": {"a": {"type": "integer"}}}
            })
        );
    }

    #[test]
    fn nested_arrays_recurse_uniformly() {
        let schema = infer_schema(&json!({"grid": [[1, 2], [3]]}));
        assert_eq!(
            schema["properties"]["grid"],
            json!({
                "type": "array",
                "items": {"type": "array", "items": {"type": "integer"}}
            })
        );
    }

    #[test]
    fn null_and_float_fields() {
        let schema = infer_schema(&json!({"gone": null, "ratio": 0.5}));
        assert_eq!(schema["properties"]["gone"], json!({"type": "null"}));
        assert_eq!(schema["properties"]["ratio"], json!({"type": "number"}));
    }

    /// Build the smallest value that satisfies a schema, used to check that
    /// inference is a fixed point over its own output.
    fn minimal_instance(schema: &Value) -> Value {
        match schema.get("type").and_then(Value::as_str) {
            Some("object") => {
                let mut out = Map::new();
                if let Some(Value::Object(props)) = schema.get("properties") {
                    for (key, field_schema) in props {
                        out.insert(key.clone(), minimal_instance(field_schema));
                    }
                }
                Value::Object(out)
            }
            Some("array") => match schema.get("items") {
                Some(items) => Value::Array(vec![minimal_instance(items)]),
                None => Value::Array(Vec::new()),
            },
            Some("string") => Value::String(String::new()),
            Some("integer") => json!(0),
            Some("number") => json!(0.5),
            Some("boolean") => Value::Bool(false),
            _ => Value::Null,
        }
    }

    #[test]
    fn inference_is_idempotent_over_minimal_instances() {
        let samples = [
            json!({"name": "a", "count": 1, "nested": {"ok": true}}),
            json!([{"id": 1, "score": 0.25}]),
            json!({"empty": [], "list": [[true]]}),
            json!("plain"),
        ];
        for value in samples {
            let schema = infer_schema(&value);
            assert_eq!(infer_schema(&minimal_instance(&schema)), schema);
        }
    }
}
