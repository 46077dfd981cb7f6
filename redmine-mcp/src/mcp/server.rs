//! MCP server exposing the tracker tools

use crate::api::{RedmineClient, Transport};
use crate::config::Config;
use crate::error::{RedmineError, Result};
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};
use std::sync::Arc;

use super::tool_registry::{ToolContext, ToolRegistry};

const INSTRUCTIONS: &str = "Tools for a Redmine issue tracker. Tool names follow <resource>_<action>, e.g. issues_list, projects_get, time_entries_create. Every tool returns JSON text; list tools include total_count, offset and limit when the tracker reports them. Upload files with attachments_upload and pass the returned token when creating issues or files.";

/// MCP server for the tracker tools
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<ToolRegistry>,
    /// Tool context containing shared state for tool execution
    pub tool_context: Arc<ToolContext>,
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer")
            .field("tools", &self.tool_registry.len())
            .finish_non_exhaustive()
    }
}

impl McpServer {
    /// Create a server talking to the tracker described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or the HTTP client
    /// cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let client = RedmineClient::from_config(&config)?;
        tracing::info!(base_url = %config.base_url, tls_verify = config.tls_verify, "tracker client ready");
        Self::with_client(client)
    }

    /// Create a server over an arbitrary transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Result<Self> {
        Self::with_client(RedmineClient::new(transport))
    }

    fn with_client(client: RedmineClient) -> Result<Self> {
        let registry = ToolRegistry::with_redmine_tools()?;

        Ok(Self {
            tool_registry: Arc::new(registry),
            tool_context: Arc::new(ToolContext::new(Arc::new(client))),
        })
    }

    /// The tools this server offers
    pub fn registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Run a tool call.
    ///
    /// Tool failures are returned as error results; only an unknown tool
    /// name is a protocol error.
    pub async fn dispatch(
        &self,
        request: CallToolRequestParam,
    ) -> std::result::Result<CallToolResult, McpError> {
        let arguments = request.arguments.unwrap_or_default();
        match self
            .tool_registry
            .invoke(&request.name, arguments, &self.tool_context)
            .await
        {
            Ok(outcome) => Ok(outcome.into()),
            Err(RedmineError::UnknownTool(name)) => Err(McpError::invalid_request(
                format!("Unknown tool: {name}"),
                None,
            )),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }
}

impl ServerHandler for McpServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.dispatch(request).await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                prompts: None,
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: None,
                logging: None,
                completions: None,
                experimental: None,
            },
            server_info: Implementation {
                name: "redmine-mcp".into(),
                version: crate::VERSION.into(),
            },
            instructions: Some(INSTRUCTIONS.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockTransport;
    use serde_json::json;

    fn server(mock: &Arc<MockTransport>) -> McpServer {
        McpServer::with_transport(mock.clone()).unwrap()
    }

    fn request(name: &str, arguments: serde_json::Value) -> CallToolRequestParam {
        CallToolRequestParam {
            name: name.to_string().into(),
            arguments: arguments.as_object().cloned(),
        }
    }

    #[test]
    fn test_get_info() {
        let mock = Arc::new(MockTransport::new());
        let info = server(&mock).get_info();

        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_none());
        assert_eq!(info.server_info.name, "redmine-mcp");
        assert_eq!(info.server_info.version, crate::VERSION);
    }

    #[test]
    fn test_new_rejects_incomplete_config() {
        let config = Config::new("", "key");
        assert!(McpServer::new(config).is_err());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let mock = Arc::new(MockTransport::new());
        let result = server(&mock).dispatch(request("issues_merge", json!({}))).await;
        assert!(result.is_err());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_error_result() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(404, json!({"errors": ["Not found"]}));

        let result = server(&mock)
            .dispatch(request("issues_get", json!({"id": 999})))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"issue": {"id": 1, "subject": "Crash"}}));

        let result = server(&mock)
            .dispatch(request("issues_get", json!({"id": 1})))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.content.len(), 1);
    }
}
