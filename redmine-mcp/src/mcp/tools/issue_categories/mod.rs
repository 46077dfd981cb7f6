//! Issue category tools

use super::{id_or_identifier_property, id_property, object_schema, register_all};
use crate::api::resource::ISSUE_CATEGORIES;
use crate::error::Result;
use crate::mcp::endpoint::{crud_tools, CrudSpec, EndpointTool, VerbSpec};
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::{json, Value};

fn category_fields() -> Vec<(&'static str, Value)> {
    vec![
        ("name", json!({"type": "string", "minLength": 1, "description": "The name of the category."})),
        ("assigned_to_id", json!({"type": "integer", "description": "User to whom new issues in this category are assigned."})),
    ]
}

fn project_property() -> Value {
    id_or_identifier_property("The ID or identifier of the project.")
}

/// Build every issue category tool
pub fn issue_category_tools() -> Result<Vec<EndpointTool>> {
    let mut create_properties = vec![("project_id", project_property())];
    create_properties.extend(category_fields());

    let mut update_properties = vec![("id", id_property("The ID of the category to update."))];
    update_properties.extend(category_fields());

    crud_tools(
        ISSUE_CATEGORIES,
        CrudSpec::new("issue_categories")
            .nested_under("project_id")
            .list(VerbSpec::new(
                "Retrieves the issue categories of a project.",
                object_schema(vec![("project_id", project_property())], &["project_id"]),
            ))
            .get(VerbSpec::new(
                "Retrieves a single issue category by its ID.",
                super::id_only_schema("The numeric ID of the issue category."),
            ))
            .create(VerbSpec::new(
                "Creates a new issue category in a project.",
                object_schema(create_properties, &["project_id", "name"]),
            ))
            .update(VerbSpec::new(
                "Updates an existing issue category.",
                object_schema(update_properties, &["id"]),
            ))
            .delete(VerbSpec::new(
                "Deletes an issue category.",
                super::id_only_schema("The ID of the category to delete."),
            )),
    )
}

/// Register all issue category tools with the registry
pub fn register_issue_category_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, issue_category_tools()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::mcp::tool_registry::ToolOutcome;
    use crate::mcp::tools::test_support::{find, run};
    use crate::test_utils::MockTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_update_message_uses_readable_label() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_empty(204);
        let tools = issue_category_tools().unwrap();

        let outcome = run(
            find(&tools, "issue_categories_update"),
            &mock,
            json!({"id": 4, "name": "Backend"}),
        )
        .await;

        assert_eq!(outcome, ToolOutcome::done("Issue category 4 updated successfully."));
        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "/issue_categories/4.json");
        assert_eq!(
            request.json_body(),
            Some(&json!({"issue_category": {"name": "Backend"}}))
        );
    }

    #[tokio::test]
    async fn test_missing_project_is_rejected() {
        let mock = Arc::new(MockTransport::new());
        let tools = issue_category_tools().unwrap();

        let outcome = run(
            find(&tools, "issue_categories_create"),
            &mock,
            json!({"name": "Backend"}),
        )
        .await;

        assert!(!outcome.is_success());
        assert!(mock.requests().is_empty());
    }
}
