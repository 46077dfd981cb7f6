//! Shared shapes of tracker payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Pointer from one entity to another, e.g. an issue's `project` or `author`.
///
/// Tools hand payloads back as JSON text; library users decode the nested
/// pointers of those payloads with this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Identifier of the referenced entity
    pub id: u64,
    /// Display name, absent for a few references such as `parent`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A page of a list operation.
///
/// Pagination metadata is kept exactly when the tracker sent it and is left
/// out of the serialized form otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope {
    /// Entities on this page
    pub items: Vec<Value>,
    /// Total number of matching entities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    /// Offset of the first item on this page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Page size the tracker applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl ListEnvelope {
    /// Build a list envelope from a raw list body keyed by `plural`.
    ///
    /// A body without the plural key yields an empty page rather than an
    /// error, which is how the tracker answers some filtered queries.
    pub fn from_body(body: &Value, plural: &str) -> Self {
        let items = body
            .get(plural)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Self {
            items,
            total_count: pagination_field(body, "total_count"),
            offset: pagination_field(body, "offset"),
            limit: pagination_field(body, "limit"),
        }
    }

    /// Serialize under the tracker's plural key, e.g. `{"issues": [...], "total_count": 3}`
    pub fn to_value(&self, plural: &str) -> Value {
        let mut map = Map::new();
        map.insert(plural.to_string(), Value::Array(self.items.clone()));
        for (key, value) in [
            ("total_count", self.total_count),
            ("offset", self.offset),
            ("limit", self.limit),
        ] {
            if let Some(v) = value {
                map.insert(key.to_string(), Value::from(v));
            }
        }
        Value::Object(map)
    }
}

fn pagination_field(body: &Value, key: &str) -> Option<u64> {
    match body.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
