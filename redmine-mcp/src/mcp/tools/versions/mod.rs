//! Version tools

use super::{id_or_identifier_property, id_property, object_schema, register_all};
use crate::api::resource::VERSIONS;
use crate::error::Result;
use crate::mcp::endpoint::{crud_tools, CrudSpec, EndpointTool, VerbSpec};
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::{json, Value};

fn version_fields() -> Vec<(&'static str, Value)> {
    vec![
        ("name", json!({"type": "string", "minLength": 1, "description": "The name of the version."})),
        ("status", json!({"type": "string", "enum": ["open", "locked", "closed"], "description": "The status of the version."})),
        ("sharing", json!({"type": "string", "enum": ["none", "descendants", "hierarchy", "tree", "system"], "description": "How the version is shared with other projects."})),
        ("due_date", json!({"type": "string", "description": "The version due date (YYYY-MM-DD)."})),
        ("description", json!({"type": "string", "description": "A short description of the version."})),
        ("wiki_page_title", json!({"type": "string", "description": "Title of the wiki page describing the version."})),
    ]
}

/// Build every version tool
pub fn version_tools() -> Result<Vec<EndpointTool>> {
    let mut create_properties = vec![(
        "project_id",
        id_or_identifier_property("The ID or identifier of the project to create the version in."),
    )];
    create_properties.extend(version_fields());

    let mut update_properties = vec![("id", id_property("The ID of the version to update."))];
    update_properties.extend(version_fields());

    crud_tools(
        VERSIONS,
        CrudSpec::new("versions")
            .nested_under("project_id")
            .list(VerbSpec::new(
                "Retrieves the versions of a project, including versions shared with it.",
                object_schema(
                    vec![(
                        "project_id",
                        id_or_identifier_property("The ID or identifier of the project to list versions for."),
                    )],
                    &["project_id"],
                ),
            ))
            .get(VerbSpec::new(
                "Retrieves a single version by its ID.",
                super::id_only_schema("The numeric ID of the version."),
            ))
            .create(VerbSpec::new(
                "Creates a new version for a project.",
                object_schema(create_properties, &["project_id", "name"]),
            ))
            .update(VerbSpec::new(
                "Updates an existing version.",
                object_schema(update_properties, &["id"]),
            ))
            .delete(VerbSpec::new(
                "Deletes a version. Fails if issues are still assigned to it.",
                super::id_only_schema("The ID of the version to delete."),
            )),
    )
}

/// Register all version-related tools with the registry
pub fn register_version_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, version_tools()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tool_registry::ToolOutcome;
    use crate::mcp::tools::test_support::{find, run};
    use crate::test_utils::MockTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_status_enum_is_enforced() {
        let mock = Arc::new(MockTransport::new());
        let tools = version_tools().unwrap();

        let outcome = run(
            find(&tools, "versions_update"),
            &mock,
            json!({"id": 2, "status": "finished"}),
        )
        .await;

        assert!(matches!(outcome, ToolOutcome::Failure { ref error } if error.contains("/status")));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_list_without_pagination_metadata() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"versions": [{"id": 1, "name": "1.0"}]}));
        let tools = version_tools().unwrap();

        let outcome = run(find(&tools, "versions_list"), &mock, json!({"project_id": 7})).await;

        let payload: Value = serde_json::from_str(&outcome.text()).unwrap();
        assert_eq!(payload, json!({"versions": [{"id": 1, "name": "1.0"}]}));
        assert_eq!(mock.last_request().unwrap().path, "/projects/7/versions.json");
    }
}
