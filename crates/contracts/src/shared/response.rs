//! Helpers for response bodies whose shape the backend does not pin down

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Pick the list out of a body that is either `{ "<key>": [...] }` or a bare
/// array. Anything else yields an empty list.
pub fn extract_list(body: &Value, key: &str) -> Vec<Value> {
    if let Some(list) = body.get(key).and_then(Value::as_array) {
        return list.clone();
    }
    body.as_array().cloned().unwrap_or_default()
}

/// Accept `"5"`, `5` or `null` for fields like `tableNumber` and `id`
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accept `1200`, `"1200"` or `null` for money fields
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "string_or_number")]
        table: Option<String>,
        #[serde(default, deserialize_with = "lenient_f64")]
        price: f64,
    }

    #[test]
    fn test_extract_list() {
        assert_eq!(extract_list(&json!({ "orders": [1, 2] }), "orders").len(), 2);
        assert_eq!(extract_list(&json!([1, 2, 3]), "orders").len(), 3);
        assert!(extract_list(&json!({ "orders": null }), "orders").is_empty());
        assert!(extract_list(&json!("text"), "orders").is_empty());
    }

    #[test]
    fn test_lenient_fields() {
        let p: Probe = serde_json::from_value(json!({ "table": 5, "price": "700" })).unwrap();
        assert_eq!(p.table.as_deref(), Some("5"));
        assert_eq!(p.price, 700.0);

        let p: Probe = serde_json::from_value(json!({ "table": null })).unwrap();
        assert_eq!(p.table, None);
        assert_eq!(p.price, 0.0);
    }
}
