//! Model Context Protocol (MCP) server support
//!
//! This module exposes the tracker's REST operations as MCP tools.

// Module declarations
pub mod endpoint;
pub mod server;
pub mod tool_registry;
pub mod tools;

// Re-export commonly used items from submodules
pub use endpoint::{EndpointTool, OutputShape};
pub use server::McpServer;
pub use tool_registry::{McpTool, ToolContext, ToolOutcome, ToolRegistry};
