//! Conversion between plain JSON and the Firestore REST typed-value encoding.
//!
//! Firestore wraps every value in a single-key object naming its type
//! (`{"stringValue": "a"}`, `{"integerValue": "12"}`, ...). Integers travel as decimal
//! strings. Empty arrays may omit `values` entirely.

use serde_json::{Map, Number, Value};

use crate::store::CollectionDocument;
use crate::types::Volume;

/// Request body for a full-document write of `volumes`.
pub fn encode_document(volumes: &[Volume]) -> Result<Value, serde_json::Error> {
    let plain = serde_json::to_value(CollectionDocument { volumes: volumes.to_vec() })?;
    let fields = match to_typed(&plain) {
        Value::Object(mut wrapper) => match wrapper.remove("mapValue") {
            Some(Value::Object(mut map)) => {
                map.remove("fields").unwrap_or_else(|| Value::Object(Map::new()))
            }
            _ => Value::Object(Map::new()),
        },
        _ => Value::Object(Map::new()),
    };
    let mut body = Map::new();
    body.insert("fields".to_string(), fields);
    Ok(Value::Object(body))
}

/// Volumes of a fetched document. A document without a `volumes` field holds none.
pub fn decode_document(body: &Value) -> Result<Vec<Volume>, String> {
    let fields = match body.get("fields") {
        Some(Value::Object(fields)) => fields,
        Some(_) => return Err("`fields` is not an object".to_string()),
        None => return Ok(Vec::new()),
    };

    let mut plain = Map::new();
    for (name, value) in fields {
        plain.insert(name.clone(), from_typed(value)?);
    }
    serde_json::from_value::<CollectionDocument>(Value::Object(plain))
        .map(|document| document.volumes)
        .map_err(|err| format!("document does not match the volume layout: {err}"))
}

pub fn to_typed(value: &Value) -> Value {
    let (kind, inner) = match value {
        Value::Null => ("nullValue", Value::Null),
        Value::Bool(flag) => ("booleanValue", Value::Bool(*flag)),
        Value::Number(number) => match number.as_i64() {
            Some(int) => ("integerValue", Value::String(int.to_string())),
            None => ("doubleValue", Value::Number(number.clone())),
        },
        Value::String(text) => ("stringValue", Value::String(text.clone())),
        Value::Array(items) => {
            let mut array = Map::new();
            if !items.is_empty() {
                let values = items.iter().map(to_typed).collect();
                array.insert("values".to_string(), Value::Array(values));
            }
            ("arrayValue", Value::Object(array))
        }
        Value::Object(entries) => {
            let fields: Map<String, Value> =
                entries.iter().map(|(key, value)| (key.clone(), to_typed(value))).collect();
            let mut map = Map::new();
            map.insert("fields".to_string(), Value::Object(fields));
            ("mapValue", Value::Object(map))
        }
    };
    let mut wrapper = Map::new();
    wrapper.insert(kind.to_string(), inner);
    Value::Object(wrapper)
}

pub fn from_typed(value: &Value) -> Result<Value, String> {
    let wrapper = value.as_object().ok_or_else(|| format!("expected typed value, got {value}"))?;
    let (kind, inner) =
        wrapper.iter().next().ok_or_else(|| "typed value without a type".to_string())?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner.as_bool().map(Value::Bool).ok_or_else(|| bad(kind, inner)),
        "integerValue" => {
            let int = match inner {
                Value::String(text) => text.parse::<i64>().map_err(|_| bad(kind, inner))?,
                Value::Number(number) => number.as_i64().ok_or_else(|| bad(kind, inner))?,
                _ => return Err(bad(kind, inner)),
            };
            Ok(Value::Number(Number::from(int)))
        }
        "doubleValue" => match inner {
            Value::Number(_) => Ok(inner.clone()),
            _ => Err(bad(kind, inner)),
        },
        "stringValue" | "timestampValue" | "referenceValue" => inner
            .as_str()
            .map(|text| Value::String(text.to_string()))
            .ok_or_else(|| bad(kind, inner)),
        "arrayValue" => match inner.get("values") {
            Some(Value::Array(items)) => {
                items.iter().map(from_typed).collect::<Result<Vec<_>, _>>().map(Value::Array)
            }
            Some(other) => Err(bad("arrayValue.values", other)),
            None => Ok(Value::Array(Vec::new())),
        },
        "mapValue" => {
            let mut map = Map::new();
            if let Some(fields) = inner.get("fields") {
                let fields = fields.as_object().ok_or_else(|| bad("mapValue.fields", fields))?;
                for (key, value) in fields {
                    map.insert(key.clone(), from_typed(value)?);
                }
            }
            Ok(Value::Object(map))
        }
        other => Err(format!("unsupported Firestore value type `{other}`")),
    }
}

fn bad(kind: &str, inner: &Value) -> String {
    format!("malformed {kind}: {inner}")
}
