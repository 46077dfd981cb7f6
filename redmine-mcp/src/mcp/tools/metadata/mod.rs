//! Read-only tracker metadata: roles, trackers, statuses, custom fields,
//! saved queries and enumerations

use super::{empty_schema, object_schema, pagination_properties, register_all};
use crate::api::resource::{
    Resource, CUSTOM_FIELDS, DOCUMENT_CATEGORIES, ISSUE_PRIORITIES, ISSUE_STATUSES, QUERIES,
    ROLES, TIME_ENTRY_ACTIVITIES, TRACKERS,
};
use crate::error::Result;
use crate::mcp::endpoint::{crud_tools, CrudSpec, EndpointTool, VerbSpec};
use crate::mcp::tool_registry::ToolRegistry;

fn list_only(resource: Resource, prefix: &'static str, description: &'static str) -> Result<Vec<EndpointTool>> {
    crud_tools(
        resource,
        CrudSpec::new(prefix).list(VerbSpec::new(description, empty_schema())),
    )
}

/// Build every metadata tool
pub fn metadata_tools() -> Result<Vec<EndpointTool>> {
    let mut tools = crud_tools(
        ROLES,
        CrudSpec::new("roles")
            .list(VerbSpec::new("Retrieves the list of roles.", empty_schema()))
            .get(VerbSpec::new(
                "Retrieves a role with its permissions.",
                super::id_only_schema("The ID of the role."),
            )),
    )?;

    tools.extend(list_only(
        TRACKERS,
        "trackers",
        "Retrieves the list of trackers with their default status.",
    )?);
    tools.extend(list_only(
        ISSUE_STATUSES,
        "issue_statuses",
        "Retrieves the list of issue statuses, flagging which ones close an issue.",
    )?);
    tools.extend(list_only(
        CUSTOM_FIELDS,
        "custom_fields",
        "Retrieves the custom field definitions. Requires administrator privileges.",
    )?);
    tools.extend(crud_tools(
        QUERIES,
        CrudSpec::new("queries").list(VerbSpec::new(
            "Retrieves the saved queries visible to the current user.",
            object_schema(pagination_properties().to_vec(), &[]),
        )),
    )?);
    tools.extend(list_only(
        ISSUE_PRIORITIES,
        "enumerations_issue_priorities",
        "Retrieves the issue priorities.",
    )?);
    tools.extend(list_only(
        TIME_ENTRY_ACTIVITIES,
        "enumerations_time_entry_activities",
        "Retrieves the time tracking activities.",
    )?);
    tools.extend(list_only(
        DOCUMENT_CATEGORIES,
        "enumerations_document_categories",
        "Retrieves the document categories.",
    )?);

    Ok(tools)
}

/// Register all metadata tools with the registry
pub fn register_metadata_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, metadata_tools()?)
}
