//! Tool registry for MCP operations
//!
//! Every tracker operation is exposed as an [`McpTool`]. Tools are collected
//! once at startup into a [`ToolRegistry`] and dispatched by name.

use crate::api::RedmineClient;
use crate::error::{RedmineError, Result};
use rmcp::model::{Annotated, CallToolResult, RawContent, RawTextContent, Tool};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Context shared by all tools during execution
#[derive(Clone, Debug)]
pub struct ToolContext {
    /// Client for the tracker's REST API
    pub client: Arc<RedmineClient>,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(client: Arc<RedmineClient>) -> Self {
        Self { client }
    }
}

/// Result of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The operation succeeded
    Success {
        /// Serialized result, absent for operations that return nothing
        payload: Option<String>,
        /// Short summary of what happened
        message: String,
    },
    /// The operation failed; `error` reads `"Failed to <operation>: <reason>"`
    Failure {
        /// Human readable reason
        error: String,
    },
}

impl ToolOutcome {
    /// Success carrying a serialized result
    pub fn payload(payload: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Success {
            payload: Some(payload.into()),
            message: message.into(),
        }
    }

    /// Success without a result
    pub fn done(message: impl Into<String>) -> Self {
        Self::Success {
            payload: None,
            message: message.into(),
        }
    }

    /// Failure with the given message
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    /// Whether the invocation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Text handed back to the caller
    pub fn text(&self) -> String {
        match self {
            Self::Success {
                payload: Some(payload),
                ..
            } => payload.clone(),
            Self::Success {
                payload: None,
                message,
            } => json!({ "success": true, "message": message }).to_string(),
            Self::Failure { error } => error.clone(),
        }
    }
}

impl From<ToolOutcome> for CallToolResult {
    fn from(outcome: ToolOutcome) -> Self {
        let text = outcome.text();
        if outcome.is_success() {
            BaseToolImpl::create_success_response(text)
        } else {
            BaseToolImpl::create_error_response(text)
        }
    }
}

/// Trait defining the interface for all MCP tools
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Get the tool's name
    fn name(&self) -> &str;

    /// Get the tool's description
    fn description(&self) -> &str;

    /// Get the tool's JSON schema for arguments
    fn schema(&self) -> Value;

    /// Execute the tool with the given arguments and context.
    ///
    /// Implementations never fail: every error is reported as
    /// [`ToolOutcome::Failure`].
    async fn execute(&self, arguments: Map<String, Value>, context: &ToolContext) -> ToolOutcome;
}

/// Registry for managing MCP tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn McpTool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list_tool_names())
            .finish()
    }
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry holding every tracker tool
    pub fn with_redmine_tools() -> Result<Self> {
        let mut registry = Self::new();
        register_issue_tools(&mut registry)?;
        register_project_tools(&mut registry)?;
        register_user_tools(&mut registry)?;
        register_group_tools(&mut registry)?;
        register_membership_tools(&mut registry)?;
        register_version_tools(&mut registry)?;
        register_issue_category_tools(&mut registry)?;
        register_issue_relation_tools(&mut registry)?;
        register_time_entry_tools(&mut registry)?;
        register_wiki_page_tools(&mut registry)?;
        register_metadata_tools(&mut registry)?;
        register_search_tools(&mut registry)?;
        register_file_tools(&mut registry)?;
        register_my_account_tools(&mut registry)?;
        debug!("registered {} tools", registry.len());
        Ok(registry)
    }

    /// Register a tool in the registry.
    ///
    /// A second tool with an already registered name is rejected.
    pub fn register<T: McpTool + 'static>(&mut self, tool: T) -> Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RedmineError::DuplicateTool(name));
        }
        self.tools.insert(name, Box::new(tool));
        Ok(())
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// List all registered tool names, sorted
    pub fn list_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get all registered tools as Tool objects for MCP list_tools response
    pub fn list_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self
            .tools
            .values()
            .map(|tool| {
                let schema_map = match tool.schema() {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                Tool {
                    name: tool.name().to_string().into(),
                    description: Some(tool.description().to_string().into()),
                    input_schema: Arc::new(schema_map),
                    annotations: None,
                }
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Invoke a tool by name.
    ///
    /// Only an unknown name is an error; every other failure is reported in
    /// the returned outcome.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> Result<ToolOutcome> {
        let tool = self
            .get_tool(name)
            .ok_or_else(|| RedmineError::UnknownTool(name.to_string()))?;

        debug!(tool = name, "invoking tool");
        Ok(tool.execute(arguments, context).await)
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Base implementation providing common utility methods for MCP tools
pub struct BaseToolImpl;

impl BaseToolImpl {
    /// Create a success response with the given text
    pub fn create_success_response<T: Into<String>>(content: T) -> CallToolResult {
        CallToolResult {
            content: vec![Annotated::new(
                RawContent::Text(RawTextContent {
                    text: content.into(),
                }),
                None,
            )],
            is_error: Some(false),
        }
    }

    /// Create an error response with the given error message
    pub fn create_error_response<T: Into<String>>(error: T) -> CallToolResult {
        CallToolResult {
            content: vec![Annotated::new(
                RawContent::Text(RawTextContent { text: error.into() }),
                None,
            )],
            is_error: Some(true),
        }
    }
}

/// Tool registration functions for organizing tools by category
/// Register all issue-related tools with the registry
pub fn register_issue_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::issues::register_issue_tools(registry)
}

/// Register all project-related tools with the registry
pub fn register_project_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::projects::register_project_tools(registry)
}

/// Register all user-related tools with the registry
pub fn register_user_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::users::register_user_tools(registry)
}

/// Register all group-related tools with the registry
pub fn register_group_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::groups::register_group_tools(registry)
}

/// Register all membership-related tools with the registry
pub fn register_membership_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::memberships::register_membership_tools(registry)
}

/// Register all version-related tools with the registry
pub fn register_version_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::versions::register_version_tools(registry)
}

/// Register all issue-category tools with the registry
pub fn register_issue_category_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::issue_categories::register_issue_category_tools(registry)
}

/// Register all issue-relation tools with the registry
pub fn register_issue_relation_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::issue_relations::register_issue_relation_tools(registry)
}

/// Register all time-entry tools with the registry
pub fn register_time_entry_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::time_entries::register_time_entry_tools(registry)
}

/// Register all wiki-page tools with the registry
pub fn register_wiki_page_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::wiki_pages::register_wiki_page_tools(registry)
}

/// Register roles, trackers, statuses, custom fields, queries and enumerations
pub fn register_metadata_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::metadata::register_metadata_tools(registry)
}

/// Register the search tool with the registry
pub fn register_search_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::search::register_search_tools(registry)
}

/// Register file and attachment tools with the registry
pub fn register_file_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::files::register_file_tools(registry)
}

/// Register the my-account tool with the registry
pub fn register_my_account_tools(registry: &mut ToolRegistry) -> Result<()> {
    crate::mcp::tools::my_account::register_my_account_tools(registry)
}
