//! Tracker tools grouped by resource
//!
//! Each submodule describes the input contracts of one resource's tools and
//! registers them with a [`ToolRegistry`].

pub mod files;
pub mod groups;
pub mod issue_categories;
pub mod issue_relations;
pub mod issues;
pub mod memberships;
pub mod metadata;
pub mod my_account;
pub mod projects;
pub mod search;
pub mod time_entries;
pub mod users;
pub mod versions;
pub mod wiki_pages;

use crate::error::Result;
use crate::mcp::endpoint::EndpointTool;
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::{json, Value};

/// Register a batch of tools, stopping at the first duplicate name
pub(crate) fn register_all(registry: &mut ToolRegistry, tools: Vec<EndpointTool>) -> Result<()> {
    for tool in tools {
        registry.register(tool)?;
    }
    Ok(())
}

/// Numeric identifier property
pub(crate) fn id_property(description: &str) -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "description": description
    })
}

/// Property accepting either a numeric ID or a string identifier
pub(crate) fn id_or_identifier_property(description: &str) -> Value {
    json!({
        "type": ["integer", "string"],
        "description": description
    })
}

/// Schema with a single required numeric `id`
pub(crate) fn id_only_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": id_property(description)
        },
        "required": ["id"]
    })
}

/// `offset`/`limit` pagination properties
pub(crate) fn pagination_properties() -> [(&'static str, Value); 2] {
    [
        (
            "offset",
            json!({
                "type": "integer",
                "minimum": 0,
                "description": "Number of items to skip for pagination."
            }),
        ),
        (
            "limit",
            json!({
                "type": "integer",
                "minimum": 1,
                "maximum": 100,
                "description": "Maximum number of items to return (default 25, max 100)."
            }),
        ),
    ]
}

/// Object schema from properties and required names
pub(crate) fn object_schema(properties: Vec<(&str, Value)>, required: &[&str]) -> Value {
    let properties: serde_json::Map<String, Value> = properties
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

/// Schema for list tools without parameters
pub(crate) fn empty_schema() -> Value {
    json!({
        "type": "object",
        "properties": {}
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_schema() {
        let schema = object_schema(vec![("id", id_property("The ID"))], &["id"]);
        assert_eq!(schema["properties"]["id"]["type"], "integer");
        assert_eq!(schema["required"], json!(["id"]));
    }

    #[test]
    fn test_every_tool_schema_is_an_object() {
        let registry = ToolRegistry::with_redmine_tools().unwrap();
        for tool in registry.list_tools() {
            assert_eq!(
                tool.input_schema.get("type"),
                Some(&json!("object")),
                "{}",
                tool.name
            );
            assert!(tool.description.as_ref().is_some_and(|d| !d.is_empty()));
        }
    }
}
