//! Issue relation tools

use super::{id_property, object_schema, register_all};
use crate::api::resource::ISSUE_RELATIONS;
use crate::error::Result;
use crate::mcp::endpoint::{crud_tools, CrudSpec, EndpointTool, VerbSpec};
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::json;

/// Relation kinds accepted by the tracker
pub const RELATION_TYPES: [&str; 9] = [
    "relates",
    "duplicates",
    "duplicated_by",
    "blocks",
    "blocked_by",
    "precedes",
    "follows",
    "copied_to",
    "copied_from",
];

/// Build every issue relation tool. Relations cannot be edited in place.
pub fn issue_relation_tools() -> Result<Vec<EndpointTool>> {
    crud_tools(
        ISSUE_RELATIONS,
        CrudSpec::new("issue_relations")
            .nested_under("issue_id")
            .list(VerbSpec::new(
                "Retrieves the relations of an issue.",
                object_schema(
                    vec![("issue_id", id_property("The ID of the issue to list relations for."))],
                    &["issue_id"],
                ),
            ))
            .get(VerbSpec::new(
                "Retrieves a single issue relation by its ID.",
                super::id_only_schema("The numeric ID of the issue relation."),
            ))
            .create(VerbSpec::new(
                "Creates a new relation from an issue to another issue.",
                object_schema(
                    vec![
                        ("issue_id", id_property("The ID of the issue to create the relation from.")),
                        ("issue_to_id", id_property("The ID of the related issue.")),
                        ("relation_type", json!({"type": "string", "enum": RELATION_TYPES, "description": "The kind of relation."})),
                        ("delay", json!({"type": "integer", "description": "Delay in days, only for 'precedes' and 'follows' relations."})),
                    ],
                    &["issue_id", "issue_to_id", "relation_type"],
                ),
            ))
            .delete(VerbSpec::new(
                "Deletes an issue relation.",
                super::id_only_schema("The ID of the issue relation to delete."),
            )),
    )
}

/// Register all issue relation tools with the registry
pub fn register_issue_relation_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, issue_relation_tools()?)
}
