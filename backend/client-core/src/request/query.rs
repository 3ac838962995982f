//! Flattening of typed params into query pairs.

use serde::Serialize;
use serde_json::Value;

/// Serialize `params` into `key=value` pairs.
///
/// - `null` values are dropped
/// - arrays repeat the key once per element
/// - nested objects are sent as compact JSON
///
/// Params must serialize to an object (or `null`, meaning no params).
pub fn to_query_pairs<P>(params: &P) -> Result<Vec<(String, String)>, String>
where
    P: Serialize + ?Sized,
{
    let value = serde_json::to_value(params).map_err(|e| e.to_string())?;

    let object = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(object) => object,
        other => {
            return Err(format!(
                "query params must be an object, got {}",
                kind_name(&other)
            ));
        }
    };

    let mut pairs = Vec::with_capacity(object.len());
    for (key, value) in object {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(scalar) = scalar_string(&item) {
                        pairs.push((key.clone(), scalar));
                    }
                }
            }
            other => {
                if let Some(scalar) = scalar_string(&other) {
                    pairs.push((key, scalar));
                }
            }
        }
    }

    Ok(pairs)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
