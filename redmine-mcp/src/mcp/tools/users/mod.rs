//! User tools

use super::{id_property, object_schema, pagination_properties, register_all};
use crate::api::query;
use crate::api::resource::USERS;
use crate::api::RedmineClient;
use crate::error::Result;
use crate::mcp::endpoint::{crud_tools, CrudSpec, EndpointTool, OutputShape, VerbSpec};
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const INCLUDE_DESCRIPTION: &str =
    "Comma-separated associations to include: 'memberships' (project memberships), 'groups' (group memberships).";

fn user_fields() -> Vec<(&'static str, Value)> {
    vec![
        ("login", json!({"type": "string", "minLength": 1, "description": "The user's unique login name."})),
        ("firstname", json!({"type": "string", "description": "The user's first name."})),
        ("lastname", json!({"type": "string", "description": "The user's last name."})),
        ("mail", json!({"type": "string", "format": "email", "description": "The user's email address. Must be unique."})),
        ("password", json!({"type": "string", "minLength": 8, "description": "The user's password, at least 8 characters."})),
        ("auth_source_id", json!({"type": "integer", "description": "Authentication source ID for external authentication (LDAP, etc.)."})),
        ("mail_notification", json!({"type": "string", "description": "Email notification option, e.g. 'only_my_events', 'none', 'all'."})),
        ("admin", json!({"type": "boolean", "description": "Whether the user has administrator privileges."})),
        ("must_change_passwd", json!({"type": "boolean", "description": "Require a password change on next login."})),
    ]
}

fn create_schema() -> Value {
    let mut properties = user_fields();
    properties.push((
        "generate_password",
        json!({"type": "boolean", "description": "Let the tracker generate a password and email it to the user. Use instead of 'password'."}),
    ));
    properties.push((
        "send_information",
        json!({"type": "boolean", "description": "Email the account information to the user."}),
    ));
    object_schema(properties, &["login", "firstname", "lastname", "mail"])
}

fn update_schema() -> Value {
    let mut properties = vec![("id", id_property("The numeric ID of the user to update."))];
    properties.extend(user_fields());
    object_schema(properties, &["id"])
}

fn list_schema() -> Value {
    let mut properties = vec![
        ("status", json!({"type": "integer", "enum": [1, 2, 3], "description": "Filter users by status: 1=active (default), 2=registered, 3=locked."})),
        ("name", json!({"type": "string", "description": "Filter by login, first name, last name or email."})),
        ("group_id", json!({"type": "integer", "description": "Only users belonging to this group."})),
    ];
    properties.extend(pagination_properties());
    object_schema(properties, &[])
}

/// Build every user tool
pub fn user_tools() -> Result<Vec<EndpointTool>> {
    let mut tools = crud_tools(
        USERS,
        CrudSpec::new("users")
            .list(VerbSpec::new(
                "Retrieves a list of users. Requires administrator privileges. Supports filtering by status, name and group.",
                list_schema(),
            ))
            .get(VerbSpec::new(
                "Retrieves a single user by ID. Administrators see full details, other users a limited view.",
                object_schema(
                    vec![
                        ("id", id_property("The numeric ID of the user to retrieve.")),
                        ("include", json!({"type": "string", "description": INCLUDE_DESCRIPTION})),
                    ],
                    &["id"],
                ),
            ))
            .create(VerbSpec::new(
                "Creates a new user. Requires administrator privileges. Provide either 'password' or 'generate_password'.",
                create_schema(),
            ))
            .update(VerbSpec::new(
                "Updates an existing user. Requires administrator privileges. Only the provided fields are changed.",
                update_schema(),
            ))
            .delete(VerbSpec::new(
                "Deletes a user. Requires administrator privileges. This action is permanent.",
                super::id_only_schema("The numeric ID of the user to delete."),
            )),
    )?;

    tools.push(EndpointTool::new(
        "users_current",
        "Retrieves the user the API key belongs to.",
        object_schema(
            vec![("include", json!({"type": "string", "description": INCLUDE_DESCRIPTION}))],
            &[],
        ),
        "retrieve current user",
        OutputShape::Entity(USERS.singular),
        |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            client.current_user(query::encode(&args, &[])).await.map(Some)
        },
    )?);

    Ok(tools)
}

/// Register all user-related tools with the registry
pub fn register_user_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, user_tools()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tool_registry::ToolOutcome;
    use crate::mcp::tools::test_support::{find, run};
    use crate::test_utils::MockTransport;

    #[tokio::test]
    async fn test_current_user() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"user": {"id": 1, "login": "admin"}}));
        let tools = user_tools().unwrap();

        let outcome = run(find(&tools, "users_current"), &mock, json!({"include": "groups"})).await;

        let payload: Value = serde_json::from_str(&outcome.text()).unwrap();
        assert_eq!(payload, json!({"id": 1, "login": "admin"}));
        let request = mock.last_request().unwrap();
        assert_eq!(request.path, "/users/current.json");
        assert_eq!(request.query, vec![("include".to_string(), "groups".to_string())]);
    }

    #[tokio::test]
    async fn test_short_password_is_rejected_locally() {
        let mock = Arc::new(MockTransport::new());
        let tools = user_tools().unwrap();

        let outcome = run(
            find(&tools, "users_update"),
            &mock,
            json!({"id": 5, "password": "short"}),
        )
        .await;

        assert!(matches!(outcome, ToolOutcome::Failure { ref error } if error.starts_with("Failed to update user 5: Invalid arguments:")));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_list_status_filter() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"users": [], "total_count": 0, "offset": 0, "limit": 25}));
        let tools = user_tools().unwrap();

        let outcome = run(find(&tools, "users_list"), &mock, json!({"status": "3"})).await;

        assert!(outcome.is_success());
        assert_eq!(
            mock.last_request().unwrap().query,
            vec![("status".to_string(), "3".to_string())]
        );
    }
}
