//! Project membership tools

use super::{id_or_identifier_property, id_property, object_schema, pagination_properties, register_all};
use crate::api::resource::MEMBERSHIPS;
use crate::error::Result;
use crate::mcp::endpoint::{crud_tools, CrudSpec, EndpointTool, VerbSpec};
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::{json, Value};

fn role_ids() -> Value {
    json!({
        "type": "array",
        "items": {"type": "integer"},
        "minItems": 1,
        "description": "IDs of the roles granted by the membership."
    })
}

/// Build every membership tool
pub fn membership_tools() -> Result<Vec<EndpointTool>> {
    let mut list_properties = vec![(
        "project_id",
        id_or_identifier_property("The ID or identifier of the project."),
    )];
    list_properties.extend(pagination_properties());

    crud_tools(
        MEMBERSHIPS,
        CrudSpec::new("memberships")
            .nested_under("project_id")
            .list(
                VerbSpec::new(
                    "Returns the list of memberships of a project, including users and groups with their roles.",
                    object_schema(list_properties, &["project_id"]),
                )
                .named("memberships_list_project_memberships"),
            )
            .get(VerbSpec::new(
                "Retrieves a single membership by its ID.",
                super::id_only_schema("The ID of the membership."),
            ))
            .create(VerbSpec::new(
                "Adds a user or group to a project with the given roles.",
                object_schema(
                    vec![
                        ("project_id", id_or_identifier_property("The ID or identifier of the project.")),
                        ("user_id", id_property("The ID of the user or group to add.")),
                        ("role_ids", role_ids()),
                    ],
                    &["project_id", "user_id", "role_ids"],
                ),
            ))
            .update(VerbSpec::new(
                "Replaces the roles of a membership.",
                object_schema(
                    vec![
                        ("id", id_property("The ID of the membership to update.")),
                        ("role_ids", role_ids()),
                    ],
                    &["id", "role_ids"],
                ),
            ))
            .delete(VerbSpec::new(
                "Deletes a membership. Inherited memberships cannot be deleted.",
                super::id_only_schema("The ID of the membership to delete."),
            )),
    )
}

/// Register all membership-related tools with the registry
pub fn register_membership_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, membership_tools()?)
}
