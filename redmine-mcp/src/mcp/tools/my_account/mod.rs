//! Account tool for the API key's owner

use super::{object_schema, register_all};
use crate::api::query;
use crate::api::resource::USERS;
use crate::api::RedmineClient;
use crate::error::Result;
use crate::mcp::endpoint::{EndpointTool, OutputShape};
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Build the account tool
pub fn my_account_tools() -> Result<Vec<EndpointTool>> {
    let get = EndpointTool::new(
        "my_account_get",
        "Retrieves the account details of the user the API key belongs to, including custom fields and API key metadata.",
        object_schema(
            vec![(
                "include",
                json!({"type": "string", "description": "Comma-separated associations to include, e.g. 'memberships', 'groups'."}),
            )],
            &[],
        ),
        "retrieve my account",
        OutputShape::Entity(USERS.singular),
        |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            client.my_account(query::encode(&args, &[])).await.map(Some)
        },
    )?;
    Ok(vec![get])
}

/// Register the account tool with the registry
pub fn register_my_account_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, my_account_tools()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tool_registry::ToolOutcome;
    use crate::mcp::tools::test_support::{find, run};
    use crate::test_utils::MockTransport;

    #[tokio::test]
    async fn test_my_account() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"user": {"id": 5, "login": "jsmith", "api_key": "x"}}));
        let tools = my_account_tools().unwrap();

        let outcome = run(find(&tools, "my_account_get"), &mock, json!({})).await;

        let payload: Value = serde_json::from_str(&outcome.text()).unwrap();
        assert_eq!(payload["login"], "jsmith");
        assert_eq!(mock.last_request().unwrap().path, "/my/account.json");
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_empty(401);
        let tools = my_account_tools().unwrap();

        let outcome = run(find(&tools, "my_account_get"), &mock, json!({})).await;

        assert_eq!(
            outcome,
            ToolOutcome::failure("Failed to retrieve my account: Request failed with status code 401")
        );
    }
}
