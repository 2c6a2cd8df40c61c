//! Conversion of decoded values to JSON, for diagnostics and downstream
//! tooling. Not part of the decode path.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Map, Value as JsonValue};

use crate::value::{Key, Value};

/// Converts a decoded value tree to JSON.
///
/// Byte strings have no JSON counterpart and are rendered as
/// `data:application/octet-stream;base64,…` URIs. Non-text map keys are
/// stringified; non-finite floats become `null`, as JSON has no encoding for
/// them.
pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Nil => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::I8(n) => json!(n),
        Value::I16(n) => json!(n),
        Value::I32(n) => json!(n),
        Value::I64(n) => json!(n),
        Value::U8(n) => json!(n),
        Value::U16(n) => json!(n),
        Value::U32(n) => json!(n),
        Value::U64(n) => json!(n),
        Value::F32(f) => json!(f),
        Value::F64(f) => json!(f),
        Value::Bytes(b) => JsonValue::String(format!(
            "data:application/octet-stream;base64,{}",
            STANDARD.encode(b)
        )),
        Value::Array(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        Value::Map(entries) => {
            let mut object = Map::with_capacity(entries.len());
            for (key, value) in entries {
                object.insert(key_string(key), to_json(value));
            }
            JsonValue::Object(object)
        }
    }
}

fn key_string(key: &Key) -> String {
    match key {
        Key::Str(s) => s.clone(),
        Key::Nil => "null".to_owned(),
        Key::Bool(b) => b.to_string(),
        Key::I8(n) => n.to_string(),
        Key::I16(n) => n.to_string(),
        Key::I32(n) => n.to_string(),
        Key::I64(n) => n.to_string(),
        Key::U8(n) => n.to_string(),
        Key::U16(n) => n.to_string(),
        Key::U32(n) => n.to_string(),
        Key::U64(n) => n.to_string(),
        Key::F32Bits(bits) => f32::from_bits(*bits).to_string(),
        Key::F64Bits(bits) => f64::from_bits(*bits).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn scalars_map_onto_json() {
        assert_eq!(to_json(&Value::Nil), JsonValue::Null);
        assert_eq!(to_json(&Value::Bool(true)), json!(true));
        assert_eq!(to_json(&Value::I8(-5)), json!(-5));
        assert_eq!(to_json(&Value::U64(u64::MAX)), json!(u64::MAX));
        assert_eq!(to_json(&Value::F64(1.5)), json!(1.5));
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(to_json(&Value::F64(f64::NAN)), JsonValue::Null);
        assert_eq!(to_json(&Value::F32(f32::INFINITY)), JsonValue::Null);
    }

    #[test]
    fn bytes_render_as_data_uri() {
        assert_eq!(
            to_json(&Value::Bytes(vec![1, 2, 3])),
            json!("data:application/octet-stream;base64,AQID")
        );
    }

    #[test]
    fn maps_keep_order_and_stringify_keys() {
        let mut entries = IndexMap::new();
        entries.insert(Key::Str("b".to_owned()), Value::I8(1));
        entries.insert(Key::U16(7), Value::I8(2));
        let out = to_json(&Value::Map(entries));
        assert_eq!(out, json!({"b": 1, "7": 2}));
        let keys: Vec<_> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "7"]);
    }
}
