//! Field masking for subset comparisons.
//!
//! The live store leaves out fields that hold their empty value and adds
//! fields nobody declared. Masking reduces a live document to the shape of
//! the declared one so neither shows up as drift.

use serde_json::{Map, Value};

use crate::error::DiffError;

/// Returns whether a value is the empty form of its type: `null`, `false`,
/// zero, `""`, `[]` or `{}`.
///
/// # Errors
///
/// Returns [`DiffError::UnrecognizedValue`] for a number that cannot be read
/// as an integer or a float.
pub fn is_empty_value(value: &Value) -> Result<bool, DiffError> {
    match value {
        Value::Null => Ok(true),
        Value::Bool(b) => Ok(!b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i == 0)
            } else if let Some(u) = n.as_u64() {
                Ok(u == 0)
            } else if let Some(f) = n.as_f64() {
                Ok(f == 0.0)
            } else {
                Err(DiffError::UnrecognizedValue {
                    value: n.to_string(),
                })
            }
        }
        Value::String(s) => Ok(s.is_empty()),
        Value::Array(items) => Ok(items.is_empty()),
        Value::Object(map) => Ok(map.is_empty()),
    }
}

/// Reduces `live` to the fields present in `declared`.
///
/// - keys in both documents are masked recursively;
/// - keys only in `declared` are copied over when their value is empty,
///   because the store never returns empty values, and dropped otherwise;
/// - keys only in `live` are dropped;
/// - sequences are masked element by element, live elements past the end
///   of the declared sequence are kept so they show up in the diff;
/// - scalars and type mismatches keep the live value.
///
/// `declared` is never modified.
///
/// # Errors
///
/// Propagates [`is_empty_value`] failures.
pub fn mask_fields(declared: &Value, live: &Value) -> Result<Value, DiffError> {
    match (declared, live) {
        (Value::Object(declared), Value::Object(live)) => {
            mask_map(declared, live).map(Value::Object)
        }
        (Value::Array(declared), Value::Array(live)) => {
            mask_list(declared, live).map(Value::Array)
        }
        _ => Ok(live.clone()),
    }
}

fn mask_map(
    declared: &Map<String, Value>,
    live: &Map<String, Value>,
) -> Result<Map<String, Value>, DiffError> {
    let mut result = Map::new();
    for (key, declared_value) in declared {
        match live.get(key) {
            Some(live_value) => {
                result.insert(key.clone(), mask_fields(declared_value, live_value)?);
            }
            None => {
                if is_empty_value(declared_value)? {
                    result.insert(key.clone(), declared_value.clone());
                }
            }
        }
    }
    Ok(result)
}

fn mask_list(declared: &[Value], live: &[Value]) -> Result<Vec<Value>, DiffError> {
    live.iter()
        .enumerate()
        .map(|(i, live_value)| match declared.get(i) {
            Some(declared_value) => mask_fields(declared_value, live_value),
            None => Ok(live_value.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mask(declared: &Value, live: &Value) -> Value {
        mask_fields(declared, live).expect("masking should succeed")
    }

    #[test]
    fn test_empty_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(is_empty_value(&value).expect("known value"), "{value} is empty");
        }
        for value in [json!(true), json!(1), json!(-2.5), json!("x"), json!([0]), json!({"a": null})] {
            assert!(!is_empty_value(&value).expect("known value"), "{value} is not empty");
        }
    }

    #[test]
    fn test_empty_declared_values_are_kept() {
        let declared = json!({
            "list": [], "map": {}, "text": "", "flag": false, "count": 0, "nothing": null,
            "name": "x"
        });
        let live = json!({ "name": "x" });

        let masked = mask(&declared, &live);
        assert_eq!(masked, declared);
    }

    #[test]
    fn test_non_empty_declared_only_keys_are_dropped() {
        let declared = json!({ "name": "x", "replicas": 3 });
        let live = json!({ "name": "x" });
        assert_eq!(mask(&declared, &live), json!({ "name": "x" }));
    }

    #[test]
    fn test_live_only_keys_are_dropped() {
        let declared = json!({ "metadata": { "name": "x" } });
        let live = json!({
            "metadata": { "name": "x", "uid": "1234", "resourceVersion": "99" },
            "status": { "phase": "Running" }
        });
        assert_eq!(mask(&declared, &live), declared);
    }

    #[test]
    fn test_scalar_differences_survive() {
        let declared = json!({ "spec": { "image": "nginx:1.25" } });
        let live = json!({ "spec": { "image": "nginx:1.24", "dnsPolicy": "ClusterFirst" } });
        assert_eq!(mask(&declared, &live), json!({ "spec": { "image": "nginx:1.24" } }));
    }

    #[test]
    fn test_type_mismatch_keeps_live_value() {
        let declared = json!({ "ports": { "http": 80 } });
        let live = json!({ "ports": [80] });
        assert_eq!(mask(&declared, &live), json!({ "ports": [80] }));
    }

    #[test]
    fn test_list_overflow_is_kept_verbatim() {
        let declared = json!({ "containers": [{ "name": "app" }] });
        let live = json!({
            "containers": [
                { "name": "app", "terminationMessagePath": "/dev/termination-log" },
                { "name": "sidecar", "image": "envoy" }
            ]
        });
        let masked = mask(&declared, &live);
        assert_eq!(masked["containers"][0], json!({ "name": "app" }));
        assert_eq!(masked["containers"][1], live["containers"][1]);
    }

    #[test]
    fn test_shorter_live_list_stays_short() {
        let declared = json!([{ "a": 1 }, { "b": 2 }]);
        let live = json!([{ "a": 1, "c": 3 }]);
        assert_eq!(mask(&declared, &live), json!([{ "a": 1 }]));
    }

    #[test]
    fn test_masking_is_idempotent() {
        let declared = json!({
            "metadata": { "name": "x", "labels": {} },
            "spec": { "containers": [{ "name": "app", "args": [] }], "replicas": 2 }
        });
        let live = json!({
            "metadata": { "name": "x", "uid": "u" },
            "spec": {
                "containers": [{ "name": "app", "image": "i" }, { "name": "extra" }],
                "replicas": 1
            },
            "status": {}
        });

        let once = mask(&declared, &live);
        let twice = mask(&declared, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_declared_is_untouched() {
        let declared = json!({ "a": { "b": [] } });
        let before = declared.clone();
        let _ = mask(&declared, &json!({ "a": 1 }));
        assert_eq!(declared, before);
    }
}
