//! Unified error handling for the Redmine MCP library
//!
//! Every fallible operation in the crate returns [`RedmineError`]. The tool
//! boundary never lets one escape: [`map_transport_error`] turns any error into
//! an [`ApiFailure`] whose message is what the caller finally sees.

use serde_json::Value;
use thiserror::Error;

/// The main error type for the Redmine MCP library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RedmineError {
    /// Required connection settings are missing or malformed
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Caller supplied arguments do not satisfy a tool's input contract
    #[error("Invalid arguments: {0}")]
    Validation(String),

    /// The tracker answered with a non-success status
    #[error("Request failed with status code {status}")]
    Api {
        /// HTTP status code returned by the tracker
        status: u16,
        /// Decoded response body, when the tracker sent one
        body: Option<Value>,
    },

    /// The HTTP request could not be performed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The tracker answered successfully but with an unexpected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Two tools were registered under the same name
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// A tool was declared with a schema that cannot be compiled
    #[error("Invalid input schema for tool '{name}': {reason}")]
    InvalidToolSchema {
        /// Name of the offending tool
        name: String,
        /// Why the schema was rejected
        reason: String,
    },

    /// No tool is registered under the requested name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, RedmineError>;

impl RedmineError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status attached to this error, if it came from the tracker
    pub fn status(&self) -> Option<u16> {
        match self {
            RedmineError::Api { status, .. } => Some(*status),
            RedmineError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// A transport failure reduced to what a caller needs to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    /// Human readable message
    pub message: String,
    /// HTTP status when the failure came from a response
    pub status: Option<u16>,
}

/// Reduce an error to a single message.
///
/// Precedence: the tracker's structured `errors` list (joined with `", "`),
/// then a single `error`/`message` string in the body, then the generic
/// display of the error itself.
pub fn map_transport_error(error: &RedmineError) -> ApiFailure {
    let status = error.status();

    let from_body = match error {
        RedmineError::Api {
            body: Some(body), ..
        } => error_list(body).or_else(|| single_message(body)),
        _ => None,
    };

    ApiFailure {
        message: from_body.unwrap_or_else(|| error.to_string()),
        status,
    }
}

fn error_list(body: &Value) -> Option<String> {
    let errors = body.get("errors")?.as_array()?;
    let messages: Vec<String> = errors
        .iter()
        .filter_map(|e| match e {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join(", "))
    }
}

fn single_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
