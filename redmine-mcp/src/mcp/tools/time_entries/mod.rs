//! Time entry tools

use super::{id_or_identifier_property, id_property, object_schema, pagination_properties, register_all};
use crate::api::resource::TIME_ENTRIES;
use crate::error::Result;
use crate::mcp::endpoint::{crud_tools, CrudSpec, EndpointTool, VerbSpec};
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::{json, Value};

fn entry_fields() -> Vec<(&'static str, Value)> {
    vec![
        ("issue_id", json!({"type": "integer", "description": "The issue the time was spent on."})),
        ("project_id", id_or_identifier_property("The project the time was spent on.")),
        ("spent_on", json!({"type": "string", "description": "Date the time was spent (YYYY-MM-DD). Defaults to today."})),
        ("hours", json!({"type": "number", "exclusiveMinimum": 0, "description": "Hours spent, e.g. 1.5 for one and a half hours."})),
        ("activity_id", json!({"type": "integer", "description": "Time tracking activity. The default activity is used when omitted."})),
        ("comments", json!({"type": "string", "maxLength": 255, "description": "Description of the work performed."})),
        ("user_id", json!({"type": "integer", "description": "Log time on behalf of another user (requires permission)."})),
    ]
}

fn list_schema() -> Value {
    let mut properties = vec![
        ("project_id", id_or_identifier_property("Filter by project ID or identifier.")),
        ("user_id", json!({"type": ["integer", "string"], "description": "Filter by user ID, or 'me' for the current user."})),
        ("issue_id", json!({"type": "integer", "description": "Filter by issue ID."})),
        ("spent_on", json!({"type": "string", "description": "Only entries spent on this date (YYYY-MM-DD)."})),
        ("from", json!({"type": "string", "description": "Only entries spent on or after this date (YYYY-MM-DD)."})),
        ("to", json!({"type": "string", "description": "Only entries spent on or before this date (YYYY-MM-DD)."})),
        ("activity_id", json!({"type": "integer", "description": "Filter by activity ID."})),
    ];
    properties.extend(pagination_properties());
    object_schema(properties, &[])
}

fn create_schema() -> Value {
    let mut schema = object_schema(entry_fields(), &["hours"]);
    schema["anyOf"] = json!([
        {"required": ["issue_id"]},
        {"required": ["project_id"]}
    ]);
    schema
}

fn update_schema() -> Value {
    let mut properties = vec![("id", id_property("The ID of the time entry to update."))];
    properties.extend(entry_fields());
    object_schema(properties, &["id"])
}

/// Build every time entry tool
pub fn time_entry_tools() -> Result<Vec<EndpointTool>> {
    crud_tools(
        TIME_ENTRIES,
        CrudSpec::new("time_entries")
            .list(VerbSpec::new(
                "Retrieves time entries, filtered by project, user, issue, activity or date range.",
                list_schema(),
            ))
            .get(VerbSpec::new(
                "Retrieves a single time entry by its ID.",
                super::id_only_schema("The numeric ID of the time entry."),
            ))
            .create(VerbSpec::new(
                "Logs time. Requires hours and either issue_id or project_id.",
                create_schema(),
            ))
            .update(VerbSpec::new(
                "Updates an existing time entry.",
                update_schema(),
            ))
            .delete(VerbSpec::new(
                "Deletes a time entry.",
                super::id_only_schema("The ID of the time entry to delete."),
            )),
    )
}

/// Register all time entry tools with the registry
pub fn register_time_entry_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, time_entry_tools()?)
}
