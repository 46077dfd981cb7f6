//! Access to the tracker's REST API
//!
//! [`transport`] moves requests over HTTP, [`client`] turns resource
//! operations into requests, and [`resource`] describes where each resource
//! lives.

/// Resource operations
pub mod client;
/// Path template rendering
pub mod path;
/// Query string encoding
pub mod query;
/// Resource catalogue
pub mod resource;
/// HTTP transport
pub mod transport;

pub use client::RedmineClient;
pub use path::PathParams;
pub use resource::Resource;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, RequestBody, Transport};
