//! Query string encoding
//!
//! Arguments are flattened the way the tracker's Rails backend parses them:
//! scalars become `key=value`, arrays become repeated `key[]=value` pairs and
//! objects become `key[sub]=value`. `null` values are not sent.

use serde_json::{Map, Value};

/// Encode every argument except the ones named in `skip`
pub fn encode(args: &Map<String, Value>, skip: &[&str]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in args {
        if skip.contains(&key.as_str()) {
            continue;
        }
        push_value(&mut pairs, key.clone(), value);
    }
    pairs
}

fn push_value(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            let key = format!("{key}[]");
            for item in items {
                if let Some(text) = scalar_text(item) {
                    pairs.push((key.clone(), text));
                }
            }
        }
        Value::Object(map) => {
            for (sub, inner) in map {
                push_value(pairs, format!("{key}[{sub}]"), inner);
            }
        }
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                pairs.push((key, text));
            }
        }
    }
}

/// Text form of a scalar; `None` for null and containers
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
