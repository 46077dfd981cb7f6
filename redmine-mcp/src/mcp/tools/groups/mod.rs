//! Group tools

use super::{id_property, object_schema, register_all};
use crate::api::query::scalar_text;
use crate::api::resource::GROUPS;
use crate::api::RedmineClient;
use crate::error::Result;
use crate::mcp::endpoint::{crud_tools, CrudSpec, EndpointTool, OutputShape, VerbSpec};
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn group_fields() -> Vec<(&'static str, Value)> {
    vec![
        ("name", json!({"type": "string", "minLength": 1, "description": "The name of the group."})),
        ("user_ids", json!({"type": "array", "items": {"type": "integer"}, "description": "IDs of the group's users."})),
    ]
}

fn membership_schema(action: &str) -> Value {
    object_schema(
        vec![
            ("group_id", id_property("The ID of the group.")),
            ("user_id", id_property(&format!("The ID of the user to {action}."))),
        ],
        &["group_id", "user_id"],
    )
}

fn member_ids(args: &Map<String, Value>) -> (String, u64) {
    let group = args.get("group_id").and_then(scalar_text).unwrap_or_default();
    let user = args.get("user_id").and_then(Value::as_u64).unwrap_or_default();
    (group, user)
}

/// Build every group tool
pub fn group_tools() -> Result<Vec<EndpointTool>> {
    let mut update_properties = vec![("id", id_property("The ID of the group to update."))];
    update_properties.extend(group_fields());

    let mut tools = crud_tools(
        GROUPS,
        CrudSpec::new("groups")
            .list(VerbSpec::new(
                "Retrieves a list of all groups. Requires administrator privileges.",
                super::empty_schema(),
            ))
            .get(VerbSpec::new(
                "Retrieves a single group by its ID.",
                object_schema(
                    vec![
                        ("id", id_property("The ID of the group to retrieve.")),
                        ("include", json!({"type": "string", "description": "Comma-separated associations to include: 'users', 'memberships'."})),
                    ],
                    &["id"],
                ),
            ))
            .create(VerbSpec::new(
                "Creates a new group.",
                object_schema(group_fields(), &["name"]),
            ))
            .update(VerbSpec::new(
                "Updates an existing group.",
                object_schema(update_properties, &["id"]),
            ))
            .delete(VerbSpec::new(
                "Deletes a group.",
                super::id_only_schema("The ID of the group to delete."),
            )),
    )?;

    tools.push(EndpointTool::new(
        "groups_add_user",
        "Adds a user to a group.",
        membership_schema("add"),
        "add user {user_id} to group {group_id}",
        OutputShape::Message("User {user_id} added to group {group_id} successfully.".to_string()),
        |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            let (group, user) = member_ids(&args);
            client.add_group_user(group, user).await.map(|_| None)
        },
    )?);

    tools.push(EndpointTool::new(
        "groups_remove_user",
        "Removes a user from a group.",
        membership_schema("remove"),
        "remove user {user_id} from group {group_id}",
        OutputShape::Message(
            "User {user_id} removed from group {group_id} successfully.".to_string(),
        ),
        |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            let (group, user) = member_ids(&args);
            client.remove_group_user(group, user).await.map(|_| None)
        },
    )?);

    Ok(tools)
}

/// Register all group-related tools with the registry
pub fn register_group_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, group_tools()?)
}
