//! Issue tools
//!
//! Filters such as `status_id: "open"`, `assigned_to_id: "me"` or
//! `created_on: ">=2024-01-01"` are forwarded verbatim; the tracker interprets
//! them.

use super::{id_property, object_schema, pagination_properties, register_all};
use crate::api::resource::ISSUES;
use crate::api::RedmineClient;
use crate::error::Result;
use crate::mcp::endpoint::{crud_tools, CrudSpec, EndpointTool, OutputShape, VerbSpec};
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn issue_fields() -> Vec<(&'static str, Value)> {
    vec![
        ("project_id", json!({"type": ["integer", "string"], "description": "The numeric ID or string identifier of the project."})),
        ("subject", json!({"type": "string", "minLength": 1, "description": "Issue subject."})),
        ("description", json!({"type": "string", "description": "Issue description."})),
        ("tracker_id", json!({"type": "integer", "description": "Tracker ID."})),
        ("status_id", json!({"type": "integer", "description": "Status ID."})),
        ("priority_id", json!({"type": "integer", "description": "Priority ID."})),
        ("assigned_to_id", json!({"type": "integer", "description": "ID of the user or group the issue is assigned to."})),
        ("category_id", json!({"type": "integer", "description": "Issue category ID."})),
        ("fixed_version_id", json!({"type": "integer", "description": "Target version ID."})),
        ("parent_issue_id", json!({"type": "integer", "description": "ID of the parent issue."})),
        ("is_private", json!({"type": "boolean", "description": "Whether the issue is private."})),
        ("estimated_hours", json!({"type": "number", "minimum": 0, "description": "Estimated number of hours."})),
        ("done_ratio", json!({"type": "integer", "minimum": 0, "maximum": 100, "description": "Percentage done."})),
        ("start_date", json!({"type": "string", "description": "Start date (YYYY-MM-DD)."})),
        ("due_date", json!({"type": "string", "description": "Due date (YYYY-MM-DD)."})),
        ("watcher_user_ids", json!({"type": "array", "items": {"type": "integer"}, "description": "IDs of users to add as watchers."})),
        ("custom_fields", json!({
            "type": "array",
            "description": "Custom field values as objects with 'id' and 'value'.",
            "items": {
                "type": "object",
                "properties": {"id": {"type": "integer"}, "value": {}},
                "required": ["id"]
            }
        })),
        ("uploads", json!({
            "type": "array",
            "description": "Files to attach, referenced by the token returned from attachments_upload.",
            "items": {
                "type": "object",
                "properties": {
                    "token": {"type": "string"},
                    "filename": {"type": "string"},
                    "content_type": {"type": "string"},
                    "description": {"type": "string"}
                },
                "required": ["token"]
            }
        })),
    ]
}

fn list_schema() -> Value {
    let mut properties = vec![
        ("project_id", json!({"type": ["integer", "string"], "description": "Filter by project ID or identifier."})),
        ("subproject_id", json!({"type": ["integer", "string"], "description": "Filter by subproject, or '!*' to exclude subprojects."})),
        ("tracker_id", json!({"type": "integer", "description": "Filter by tracker ID."})),
        ("status_id", json!({"type": ["integer", "string"], "description": "Filter by status ID, or 'open', 'closed' or '*' for all."})),
        ("assigned_to_id", json!({"type": ["integer", "string"], "description": "Filter by assignee ID, or 'me' for the current user."})),
        ("author_id", json!({"type": ["integer", "string"], "description": "Filter by author ID, or 'me' for the current user."})),
        ("priority_id", json!({"type": "integer", "description": "Filter by priority ID."})),
        ("category_id", json!({"type": "integer", "description": "Filter by issue category ID."})),
        ("fixed_version_id", json!({"type": "integer", "description": "Filter by target version ID."})),
        ("parent_id", json!({"type": "integer", "description": "Filter by parent issue ID."})),
        ("issue_id", json!({"type": "string", "description": "Comma-separated list of issue IDs."})),
        ("query_id", json!({"type": "integer", "description": "Apply a saved query."})),
        ("created_on", json!({"type": "string", "description": "Filter by creation date, e.g. '>=2024-01-01' or '><2024-01-01|2024-01-31'."})),
        ("updated_on", json!({"type": "string", "description": "Filter by update date, e.g. '>=2024-01-01'."})),
        ("closed_on", json!({"type": "string", "description": "Filter by close date, e.g. '<=2024-01-31'."})),
        ("sort", json!({"type": "string", "description": "Comma-separated sort fields, e.g. 'priority:desc,updated_on:desc'."})),
        ("include", json!({"type": "string", "description": "Comma-separated associations to include, e.g. 'attachments,relations'."})),
    ];
    properties.extend(pagination_properties());
    object_schema(properties, &[])
}

fn get_schema() -> Value {
    object_schema(
        vec![
            ("id", id_property("The numeric ID of the issue to retrieve.")),
            ("include", json!({"type": "string", "description": "Comma-separated related data to include, e.g. 'journals,attachments,watchers,children,relations,changesets,allowed_statuses'."})),
        ],
        &["id"],
    )
}

fn create_schema() -> Value {
    object_schema(issue_fields(), &["project_id", "subject"])
}

fn update_schema() -> Value {
    let mut properties = vec![("id", id_property("The ID of the issue to update."))];
    properties.extend(issue_fields());
    properties.push(("notes", json!({"type": "string", "description": "Add a journal note to the issue update."})));
    properties.push(("private_notes", json!({"type": "boolean", "description": "Whether the journal note is private."})));
    object_schema(properties, &["id"])
}

fn watcher_schema(action: &str) -> Value {
    object_schema(
        vec![
            ("issue_id", id_property("The ID of the issue.")),
            ("user_id", id_property(&format!("The ID of the user to {action}."))),
        ],
        &["issue_id", "user_id"],
    )
}

fn ids(args: &Map<String, Value>) -> (String, u64) {
    let issue = args
        .get("issue_id")
        .and_then(crate::api::query::scalar_text)
        .unwrap_or_default();
    let user = args.get("user_id").and_then(Value::as_u64).unwrap_or_default();
    (issue, user)
}

/// Build every issue tool
pub fn issue_tools() -> Result<Vec<EndpointTool>> {
    let mut tools = crud_tools(
        ISSUES,
        CrudSpec::new("issues")
            .list(VerbSpec::new(
                "Lists issues, optionally filtered by project, tracker, status, assignee, dates and more. Supports sorting and pagination.",
                list_schema(),
            ))
            .get(VerbSpec::new(
                "Retrieves a single issue by its ID, optionally with journals, attachments, relations and other associations.",
                get_schema(),
            ))
            .create(VerbSpec::new(
                "Creates a new issue in a project. Requires project_id and subject.",
                create_schema(),
            ))
            .update(VerbSpec::new(
                "Updates an existing issue. Only the provided fields are changed; 'notes' adds a journal entry.",
                update_schema(),
            ))
            .delete(VerbSpec::new(
                "Deletes an issue. This action is permanent.",
                super::id_only_schema("The ID of the issue to delete."),
            )),
    )?;

    tools.push(EndpointTool::new(
        "issues_add_watcher",
        "Adds a user as a watcher of an issue.",
        watcher_schema("add as watcher"),
        "add watcher {user_id} to issue {issue_id}",
        OutputShape::Message("User {user_id} added as watcher of issue {issue_id}.".to_string()),
        |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            let (issue, user) = ids(&args);
            client.add_watcher(issue, user).await.map(|_| None)
        },
    )?);

    tools.push(EndpointTool::new(
        "issues_remove_watcher",
        "Removes a watcher from an issue.",
        watcher_schema("remove from the watchers"),
        "remove watcher {user_id} from issue {issue_id}",
        OutputShape::Message("User {user_id} removed from watchers of issue {issue_id}.".to_string()),
        |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            let (issue, user) = ids(&args);
            client.remove_watcher(issue, user).await.map(|_| None)
        },
    )?);

    Ok(tools)
}

/// Register all issue-related tools with the registry
pub fn register_issue_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, issue_tools()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::mcp::tool_registry::ToolOutcome;
    use crate::mcp::tools::test_support::{find, run};
    use crate::test_utils::MockTransport;

    #[test]
    fn test_issue_tool_names() {
        let names: Vec<String> = issue_tools()
            .unwrap()
            .iter()
            .map(|t| crate::mcp::tool_registry::McpTool::name(t).to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "issues_list",
                "issues_get",
                "issues_create",
                "issues_update",
                "issues_delete",
                "issues_add_watcher",
                "issues_remove_watcher"
            ]
        );
    }

    #[tokio::test]
    async fn test_list_passes_filters_verbatim() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"issues": [], "total_count": 0, "offset": 0, "limit": 25}));
        let tools = issue_tools().unwrap();

        let outcome = run(
            find(&tools, "issues_list"),
            &mock,
            json!({"project_id": "demo", "status_id": "*", "assigned_to_id": "me", "created_on": ">=2024-01-01"}),
        )
        .await;

        assert!(outcome.is_success());
        let request = mock.last_request().unwrap();
        assert_eq!(request.path, "/issues.json");
        for expected in [
            ("project_id", "demo"),
            ("status_id", "*"),
            ("assigned_to_id", "me"),
            ("created_on", ">=2024-01-01"),
        ] {
            assert!(
                request
                    .query
                    .contains(&(expected.0.to_string(), expected.1.to_string())),
                "missing {expected:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_create_requires_subject() {
        let mock = Arc::new(MockTransport::new());
        let tools = issue_tools().unwrap();

        let outcome = run(find(&tools, "issues_create"), &mock, json!({"project_id": 1})).await;

        assert!(matches!(outcome, ToolOutcome::Failure { ref error } if error.contains("\"subject\" is a required property")));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_add_watcher() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_empty(204);
        let tools = issue_tools().unwrap();

        let outcome = run(
            find(&tools, "issues_add_watcher"),
            &mock,
            json!({"issue_id": "42", "user_id": "7"}),
        )
        .await;

        assert_eq!(
            outcome,
            ToolOutcome::done("User 7 added as watcher of issue 42.")
        );
        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/issues/42/watchers.json");
        assert_eq!(request.json_body(), Some(&json!({"user_id": 7})));
    }
}
