//! Transform engine for JSON documents.
//!
//! Applies a named operation (`filter`, `map`, `sort`) to an input value
//! and produces a new value, leaving the input untouched. Parameter or
//! shape problems surface as errors instead of silently passing data
//! through unchanged.

use crate::error::{DataDockError, DataDockResult};
use crate::schema::TypeTag;
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Apply a named transform operation to `input` with the given parameters.
///
/// # Errors
///
/// Returns [`DataDockError::UnsupportedOperation`] for an unknown operation
/// name, [`DataDockError::InvalidInput`] when a required parameter is
/// missing or has the wrong type, and [`DataDockError::TypeMismatch`] when
/// the input's JSON shape does not fit the operation.
pub fn transform(
    input: &Value,
    operation: &str,
    parameters: &Map<String, Value>,
) -> DataDockResult<Value> {
    match operation {
        "filter" => filter(input, parameters),
        "map" => map_fields(input, parameters),
        "sort" => sort(input, parameters),
        other => Err(DataDockError::UnsupportedOperation(other.to_string())),
    }
}

/// Keep only the array elements whose `key` field equals the target value.
///
/// Equality is full JSON equality, so `1` does not match `1.0` and a
/// missing key never matches, not even when the target value is `null`.
/// Non-object elements are dropped.
fn filter(input: &Value, parameters: &Map<String, Value>) -> DataDockResult<Value> {
    let key = required_str_param(parameters, "key", "filter")?;
    let target = parameters.get("value").ok_or_else(|| {
        DataDockError::InvalidInput("filter requires a 'value' parameter".to_string())
    })?;
    let items = as_array(input, "filter")?;

    let kept: Vec<Value> = items
        .iter()
        .filter(|item| item.as_object().and_then(|obj| obj.get(key)) == Some(target))
        .cloned()
        .collect();
    Ok(Value::Array(kept))
}

/// Rename object keys according to the `field_map` parameter.
///
/// Applies to a single object or to every object element of an array.
/// Keys keep their positions; values are untouched. When two source keys
/// map to the same target, the later one wins.
fn map_fields(input: &Value, parameters: &Map<String, Value>) -> DataDockResult<Value> {
    let renames = match parameters.get("field_map") {
        None => HashMap::new(),
        Some(Value::Object(pairs)) => {
            let mut table = HashMap::with_capacity(pairs.len());
            for (from, to) in pairs {
                let to = to.as_str().ok_or_else(|| {
                    DataDockError::InvalidInput(format!(
                        "field_map entry '{}' must map to a string",
                        from
                    ))
                })?;
                table.insert(from.as_str(), to);
            }
            table
        }
        Some(_) => {
            return Err(DataDockError::InvalidInput(
                "'field_map' must be an object of string to string".to_string(),
            ))
        }
    };

    match input {
        Value::Object(fields) => Ok(rename_object(fields, &renames)),
        Value::Array(items) => {
            let mut mapped = Vec::with_capacity(items.len());
            for item in items {
                let fields = item.as_object().ok_or_else(|| {
                    DataDockError::TypeMismatch(format!(
                        "map requires object elements, got {}",
                        TypeTag::of(item)
                    ))
                })?;
                mapped.push(rename_object(fields, &renames));
            }
            Ok(Value::Array(mapped))
        }
        other => Err(DataDockError::TypeMismatch(format!(
            "map requires an object or an array of objects, got {}",
            TypeTag::of(other)
        ))),
    }
}

fn rename_object(fields: &Map<String, Value>, renames: &HashMap<&str, &str>) -> Value {
    let mut out = Map::with_capacity(fields.len());
    for (key, value) in fields {
        let target = renames
            .get(key.as_str())
            .map(|to| (*to).to_string())
            .unwrap_or_else(|| key.clone());
        out.insert(target, value.clone());
    }
    Value::Object(out)
}

/// Sort key extracted from one element, classified so that mixed key
/// types across elements can be rejected before comparing anything.
enum SortKey {
    Text(String),
    Num(Number),
    Flag(bool),
}

impl SortKey {
    fn class(&self) -> &'static str {
        match self {
            SortKey::Text(_) => "string",
            SortKey::Num(_) => "number",
            SortKey::Flag(_) => "boolean",
        }
    }
}

/// Stable sort of an array of objects by the value at `key`.
///
/// Elements missing the key sort with an empty-string key. All present
/// keys must fall in one comparable class (strings, numbers, or booleans);
/// null, array, or object keys and mixed classes are rejected. The
/// `reverse` parameter flips the comparator, so equal keys still keep
/// their original relative order.
fn sort(input: &Value, parameters: &Map<String, Value>) -> DataDockResult<Value> {
    let key = required_str_param(parameters, "key", "sort")?;
    let reverse = match parameters.get("reverse") {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => {
            return Err(DataDockError::InvalidInput(
                "'reverse' must be a boolean".to_string(),
            ))
        }
    };
    let items = as_array(input, "sort")?;

    let mut keys = Vec::with_capacity(items.len());
    for item in items {
        keys.push(sort_key_for(item, key)?);
    }
    if let Some(first) = keys.first() {
        let class = first.class();
        if let Some(stray) = keys.iter().find(|k| k.class() != class) {
            return Err(DataDockError::TypeMismatch(format!(
                "sort key '{}' mixes {} and {} values",
                key,
                class,
                stray.class()
            )));
        }
    }

    let mut decorated: Vec<(SortKey, Value)> =
        keys.into_iter().zip(items.iter().cloned()).collect();
    decorated.sort_by(|(a, _), (b, _)| {
        if reverse {
            compare_keys(b, a)
        } else {
            compare_keys(a, b)
        }
    });
    Ok(Value::Array(decorated.into_iter().map(|(_, v)| v).collect()))
}

fn sort_key_for(item: &Value, key: &str) -> DataDockResult<SortKey> {
    let fields = item.as_object().ok_or_else(|| {
        DataDockError::TypeMismatch(format!(
            "sort requires object elements, got {}",
            TypeTag::of(item)
        ))
    })?;
    match fields.get(key) {
        None => Ok(SortKey::Text(String::new())),
        Some(Value::String(s)) => Ok(SortKey::Text(s.clone())),
        Some(Value::Number(n)) => Ok(SortKey::Num(n.clone())),
        Some(Value::Bool(b)) => Ok(SortKey::Flag(*b)),
        Some(other) => Err(DataDockError::TypeMismatch(format!(
            "cannot sort by {} value at key '{}'",
            TypeTag::of(other),
            key
        ))),
    }
}

fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        (SortKey::Num(x), SortKey::Num(y)) => compare_numbers(x, y),
        (SortKey::Flag(x), SortKey::Flag(y)) => x.cmp(y),
        // Mixed classes are rejected before sorting starts.
        _ => Ordering::Equal,
    }
}

/// Compare two JSON numbers, exactly when both fit the same integer
/// representation and through f64 otherwise.
fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or_default();
    let y = b.as_f64().unwrap_or_default();
    x.total_cmp(&y)
}

fn required_str_param<'a>(
    parameters: &'a Map<String, Value>,
    name: &str,
    operation: &str,
) -> DataDockResult<&'a str> {
    parameters
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            DataDockError::InvalidInput(format!(
                "{} requires a string '{}' parameter",
                operation, name
            ))
        })
}

fn as_array<'a>(input: &'a Value, operation: &str) -> DataDockResult<&'a Vec<Value>> {
    input.as_array().ok_or_else(|| {
        DataDockError::TypeMismatch(format!(
            "{} requires an array input, got {}",
            operation,
            TypeTag::of(input)
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let result = transform(&json!([]), "explode", &Map::new());
        assert!(matches!(
            result,
            Err(DataDockError::UnsupportedOperation(name)) if name == "explode"
        ));
    }

    #[test]
    fn filter_keeps_matching_elements_in_order() {
        let input = json!([
            {"name": "a", "active": true},
            {"name": "b", "active": false},
            {"name": "c", "active": true},
        ]);
        let out = transform(&input, "filter", &params(json!({"key": "active", "value": true})))
            .unwrap();
        assert_eq!(out, json!([{"name": "a", "active": true}, {"name": "c", "active": true}]));
    }

    #[test]
    fn filter_equality_does_not_coerce_types() {
        let input = json!([{"n": 1}, {"n": 1.0}, {"n": "1"}]);
        let out = transform(&input, "filter", &params(json!({"key": "n", "value": 1}))).unwrap();
        assert_eq!(out, json!([{"n": 1}]));
    }

    #[test]
    fn filter_missing_key_never_matches_null() {
        let input = json!([{"a": null}, {"b": 1}]);
        let out = transform(&input, "filter", &params(json!({"key": "a", "value": null}))).unwrap();
        assert_eq!(out, json!([{"a": null}]));
    }

    #[test]
    fn filter_drops_non_object_elements() {
        let input = json!([{"k": 1}, 5, "x", {"k": 1}]);
        let out = transform(&input, "filter", &params(json!({"key": "k", "value": 1}))).unwrap();
        assert_eq!(out, json!([{"k": 1}, {"k": 1}]));
    }

    #[test]
    fn filter_requires_array_input() {
        let result = transform(
            &json!({"k": 1}),
            "filter",
            &params(json!({"key": "k", "value": 1})),
        );
        assert!(matches!(result, Err(DataDockError::TypeMismatch(_))));
    }

    #[test]
    fn filter_requires_key_and_value_parameters() {
        let no_key = transform(&json!([]), "filter", &params(json!({"value": 1})));
        assert!(matches!(no_key, Err(DataDockError::InvalidInput(_))));

        let no_value = transform(&json!([]), "filter", &params(json!({"key": "k"})));
        assert!(matches!(no_value, Err(DataDockError::InvalidInput(_))));
    }

    #[test]
    fn map_renames_keys_in_place() {
        let input = json!([{"old": 1, "keep": 2}]);
        let out = transform(
            &input,
            "map",
            &params(json!({"field_map": {"old": "new"}})),
        )
        .unwrap();
        assert_eq!(out, json!([{"new": 1, "keep": 2}]));
        // Renamed key keeps its position.
        let keys: Vec<&String> = out[0].as_object().map(|o| o.keys().collect()).unwrap_or_default();
        assert_eq!(keys, ["new", "keep"]);
    }

    #[test]
    fn map_applies_to_single_object() {
        let out = transform(
            &json!({"a": 1}),
            "map",
            &params(json!({"field_map": {"a": "b"}})),
        )
        .unwrap();
        assert_eq!(out, json!({"b": 1}));
    }

    #[test]
    fn map_without_field_map_copies_input() {
        let input = json!([{"a": 1}, {"b": 2}]);
        let out = transform(&input, "map", &Map::new()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn map_collision_keeps_later_value_at_first_position() {
        let input = json!({"x": 1, "mid": 0, "y": 2});
        let out = transform(
            &input,
            "map",
            &params(json!({"field_map": {"x": "same", "y": "same"}})),
        )
        .unwrap();
        assert_eq!(out, json!({"same": 2, "mid": 0}));
    }

    #[test]
    fn map_rejects_non_object_elements() {
        let result = transform(&json!([1, 2]), "map", &Map::new());
        assert!(matches!(result, Err(DataDockError::TypeMismatch(_))));
    }

    #[test]
    fn map_rejects_scalar_input() {
        let result = transform(&json!("text"), "map", &Map::new());
        assert!(matches!(result, Err(DataDockError::TypeMismatch(_))));
    }

    #[test]
    fn map_rejects_non_string_field_map_target() {
        let result = transform(
            &json!({"a": 1}),
            "map",
            &params(json!({"field_map": {"a": 3}})),
        );
        assert!(matches!(result, Err(DataDockError::InvalidInput(_))));
    }

    #[test]
    fn sort_requires_array_input() {
        for input in [json!({"k": 1}), json!(5)] {
            let result = transform(&input, "sort", &params(json!({"key": "k"})));
            assert!(matches!(result, Err(DataDockError::TypeMismatch(_))));
        }
    }

    #[test]
    fn sort_orders_by_string_key() {
        let input = json!([{"name": "carol"}, {"name": "alice"}, {"name": "bob"}]);
        let out = transform(&input, "sort", &params(json!({"key": "name"}))).unwrap();
        assert_eq!(out, json!([{"name": "alice"}, {"name": "bob"}, {"name": "carol"}]));
    }

    #[test]
    fn sort_reverse_flips_order() {
        let input = json!([{"n": 1}, {"n": 3}, {"n": 2}]);
        let out = transform(&input, "sort", &params(json!({"key": "n", "reverse": true}))).unwrap();
        assert_eq!(out, json!([{"n": 3}, {"n": 2}, {"n": 1}]));
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let input = json!([
            {"k": "b", "id": 1},
            {"k": "a", "id": 2},
            {"k": "b", "id": 3},
        ]);
        let out = transform(&input, "sort", &params(json!({"key": "k"}))).unwrap();
        assert_eq!(
            out,
            json!([{"k": "a", "id": 2}, {"k": "b", "id": 1}, {"k": "b", "id": 3}])
        );

        let reversed =
            transform(&input, "sort", &params(json!({"key": "k", "reverse": true}))).unwrap();
        // Equal keys keep their original relative order even when reversed.
        assert_eq!(
            reversed,
            json!([{"k": "b", "id": 1}, {"k": "b", "id": 3}, {"k": "a", "id": 2}])
        );
    }

    #[test]
    fn sort_missing_key_uses_empty_string() {
        let input = json!([{"name": "zed"}, {"other": 1}, {"name": "amy"}]);
        let out = transform(&input, "sort", &params(json!({"key": "name"}))).unwrap();
        assert_eq!(out, json!([{"other": 1}, {"name": "amy"}, {"name": "zed"}]));
    }

    #[test]
    fn sort_compares_integers_and_floats_together() {
        let input = json!([{"n": 2.5}, {"n": 1}, {"n": 2}]);
        let out = transform(&input, "sort", &params(json!({"key": "n"}))).unwrap();
        assert_eq!(out, json!([{"n": 1}, {"n": 2}, {"n": 2.5}]));
    }

    #[test]
    fn sort_large_integers_compare_exactly() {
        let input = json!([{"n": 9007199254740993i64}, {"n": 9007199254740992i64}]);
        let out = transform(&input, "sort", &params(json!({"key": "n"}))).unwrap();
        assert_eq!(
            out,
            json!([{"n": 9007199254740992i64}, {"n": 9007199254740993i64}])
        );
    }

    #[test]
    fn sort_booleans_false_before_true() {
        let input = json!([{"f": true}, {"f": false}]);
        let out = transform(&input, "sort", &params(json!({"key": "f"}))).unwrap();
        assert_eq!(out, json!([{"f": false}, {"f": true}]));
    }

    #[test]
    fn sort_rejects_mixed_key_classes() {
        let input = json!([{"k": "a"}, {"k": 1}]);
        let result = transform(&input, "sort", &params(json!({"key": "k"})));
        assert!(matches!(result, Err(DataDockError::TypeMismatch(_))));
    }

    #[test]
    fn sort_rejects_null_and_container_keys() {
        for bad in [json!(null), json!([1]), json!({"x": 1})] {
            let input = json!([{"k": bad}]);
            let result = transform(&input, "sort", &params(json!({"key": "k"})));
            assert!(matches!(result, Err(DataDockError::TypeMismatch(_))));
        }
    }

    #[test]
    fn sort_rejects_non_boolean_reverse() {
        let input = json!([{"k": 1}]);
        let result = transform(&input, "sort", &params(json!({"key": "k", "reverse": "yes"})));
        assert!(matches!(result, Err(DataDockError::InvalidInput(_))));
    }

    #[test]
    fn transform_leaves_input_untouched() {
        let input = json!([{"n": 2}, {"n": 1}]);
        let before = input.clone();
        let _ = transform(&input, "sort", &params(json!({"key": "n"}))).unwrap();
        assert_eq!(input, before);
    }
}
