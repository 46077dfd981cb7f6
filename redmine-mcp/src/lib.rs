//! # redmine-mcp
//!
//! Exposes the REST API of a Redmine issue tracker as Model Context Protocol
//! tools.
//!
//! ## Layers
//!
//! - **Transport**: authenticated JSON/HTTP calls against one tracker
//! - **Operations**: list/get/create/update/delete per resource, plus the
//!   tracker's special endpoints (archiving, watchers, uploads, search)
//! - **Tools**: named MCP tools with JSON Schema input contracts, collected in
//!   a registry and served over stdio
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use redmine_mcp::{Config, McpServer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let server = McpServer::new(config)?;
//! println!("{} tools", server.registry().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Access to the tracker's REST API
pub mod api;

/// Shared helpers
pub mod common;

/// Connection settings
pub mod config;

/// Error types used throughout the library
pub mod error;

/// Model Context Protocol (MCP) server support
pub mod mcp;

/// Wire types shared by several resources
pub mod model;

// Re-export core types
pub use api::{RedmineClient, Resource};
pub use config::{Config, ConfigError};
pub use error::{RedmineError, Result};
pub use mcp::{McpServer, McpTool, ToolContext, ToolOutcome, ToolRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Test utilities module for testing support
#[doc(hidden)]
pub mod test_utils;
