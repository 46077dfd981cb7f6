//! Project tools

use super::{id_or_identifier_property, object_schema, pagination_properties, register_all};
use crate::api::query::scalar_text;
use crate::api::resource::PROJECTS;
use crate::api::RedmineClient;
use crate::error::Result;
use crate::mcp::endpoint::{crud_tools, CrudSpec, EndpointTool, OutputShape, VerbSpec};
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn project_fields() -> Vec<(&'static str, Value)> {
    vec![
        ("name", json!({"type": "string", "minLength": 1, "description": "The name of the project."})),
        ("identifier", json!({"type": "string", "minLength": 1, "description": "The unique identifier of the project (lowercase letters, digits, dashes and underscores)."})),
        ("description", json!({"type": "string", "description": "A short description of the project."})),
        ("homepage", json!({"type": "string", "description": "Project homepage URL."})),
        ("is_public", json!({"type": "boolean", "description": "Whether the project is public."})),
        ("parent_id", json!({"type": "integer", "description": "The ID of the parent project."})),
        ("inherit_members", json!({"type": "boolean", "description": "Whether to inherit members from the parent project."})),
        ("default_assigned_to_id", json!({"type": "integer", "description": "Default assignee for new issues."})),
        ("default_version_id", json!({"type": "integer", "description": "Default target version for new issues."})),
        ("tracker_ids", json!({"type": "array", "items": {"type": "integer"}, "description": "Trackers enabled in the project."})),
        ("enabled_module_names", json!({"type": "array", "items": {"type": "string"}, "description": "Modules enabled in the project, e.g. 'issue_tracking', 'wiki'."})),
        ("issue_custom_field_ids", json!({"type": "array", "items": {"type": "integer"}, "description": "Issue custom fields enabled in the project."})),
    ]
}

fn list_schema() -> Value {
    let mut properties = vec![
        ("include", json!({"type": "string", "description": "Comma-separated associations to include: 'trackers', 'issue_categories', 'enabled_modules', 'time_entry_activities', 'issue_custom_fields'."})),
        ("status", json!({"type": "integer", "enum": [1, 5, 9], "description": "Filter by status: 1=active, 5=archived, 9=closed."})),
    ];
    properties.extend(pagination_properties());
    object_schema(properties, &[])
}

fn id_schema(action: &str) -> Value {
    object_schema(
        vec![(
            "id",
            id_or_identifier_property(&format!("The ID or identifier of the project to {action}.")),
        )],
        &["id"],
    )
}

fn get_schema() -> Value {
    object_schema(
        vec![
            ("id", id_or_identifier_property("The numeric ID or string identifier of the project.")),
            ("include", json!({"type": "string", "description": "Comma-separated associations to include: 'trackers', 'issue_categories', 'enabled_modules', 'time_entry_activities', 'issue_custom_fields'."})),
        ],
        &["id"],
    )
}

fn update_schema() -> Value {
    let mut properties = vec![(
        "id",
        id_or_identifier_property("The ID or identifier of the project to update."),
    )];
    properties.extend(project_fields());
    object_schema(properties, &["id"])
}

fn archive_tool(archive: bool) -> Result<EndpointTool> {
    let (name, verb) = if archive {
        ("projects_archive", "archive")
    } else {
        ("projects_unarchive", "unarchive")
    };

    EndpointTool::new(
        name,
        if archive {
            "Archives a project. Archived projects are read-only and hidden from most lists."
        } else {
            "Unarchives a project."
        },
        id_schema(verb),
        format!("{verb} project {{id}}"),
        OutputShape::Message(format!("Project {{id}} {verb}d successfully.")),
        move |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            let id = args.get("id").and_then(scalar_text).unwrap_or_default();
            if archive {
                client.archive_project(id).await?;
            } else {
                client.unarchive_project(id).await?;
            }
            Ok(None)
        },
    )
}

/// Build every project tool
pub fn project_tools() -> Result<Vec<EndpointTool>> {
    let mut tools = crud_tools(
        PROJECTS,
        CrudSpec::new("projects")
            .list(VerbSpec::new(
                "Retrieves a list of all projects visible to the current user. Supports pagination.",
                list_schema(),
            ))
            .get(VerbSpec::new(
                "Retrieves a single project by its ID or identifier.",
                get_schema(),
            ))
            .create(VerbSpec::new(
                "Creates a new project. Requires name and identifier.",
                object_schema(project_fields(), &["name", "identifier"]),
            ))
            .update(VerbSpec::new(
                "Updates an existing project. Only the provided fields are changed.",
                update_schema(),
            ))
            .delete(VerbSpec::new(
                "Deletes a project and all of its data. This action is permanent.",
                id_schema("delete"),
            )),
    )?;

    tools.push(archive_tool(true)?);
    tools.push(archive_tool(false)?);
    Ok(tools)
}

/// Register all project-related tools with the registry
pub fn register_project_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, project_tools()?)
}
