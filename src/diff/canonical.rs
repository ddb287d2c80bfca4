//! Canonical text form of documents.

use serde_json::{Map, Value};

/// Serializes a document as two-space indented JSON with keys sorted at
/// every level and a trailing newline, so each line ends in `\n` and key
/// order never shows up as a difference.
///
/// # Errors
///
/// Returns the serializer error if the document cannot be written.
pub fn canonical_text(value: &Value) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(&sorted(value))?;
    text.push('\n');
    Ok(text)
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = Map::new();
            for (key, item) in entries {
                out.insert(key.clone(), sorted(item));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layout() {
        let text = canonical_text(&json!({ "b": [1, {}], "a": { "d": null, "c": "x" } }))
            .expect("serializable");
        assert_eq!(
            text,
            "{\n  \"a\": {\n    \"c\": \"x\",\n    \"d\": null\n  },\n  \"b\": [\n    1,\n    {}\n  ]\n}\n"
        );
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let first: Value = serde_json::from_str(r#"{"z": 1, "a": {"y": 2, "b": 3}}"#).expect("json");
        let second: Value = serde_json::from_str(r#"{"a": {"b": 3, "y": 2}, "z": 1}"#).expect("json");
        assert_eq!(
            canonical_text(&first).expect("serializable"),
            canonical_text(&second).expect("serializable")
        );
    }
}
