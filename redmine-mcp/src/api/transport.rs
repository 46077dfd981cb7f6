//! HTTP transport to the tracker
//!
//! [`Transport`] is the seam between resource operations and the network.
//! [`HttpTransport`] is the production implementation; tests substitute a
//! recording implementation of the same trait.

use crate::config::{Config, ConfigError};
use crate::error::{RedmineError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Header carrying the API key on every request
pub const API_KEY_HEADER: &str = "X-Redmine-API-Key";

/// HTTP methods used by the tracker API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document
    Json(Value),
    /// Raw bytes, used for file uploads
    Binary {
        /// File content
        data: Vec<u8>,
        /// Value of the `Content-Type` header
        content_type: String,
    },
}

/// A single call to the tracker, relative to the configured base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path starting with `/`, e.g. `/issues/42.json`
    pub path: String,
    /// Query parameters in send order
    pub query: Vec<(String, String)>,
    /// Optional body
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    /// Create a request without query or body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Attach query parameters
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Attach a JSON body
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Attach a binary body
    pub fn with_binary(mut self, data: Vec<u8>, content_type: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Binary {
            data,
            content_type: content_type.into(),
        });
        self
    }

    /// JSON body, if any
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Some(RequestBody::Json(value)) => Some(value),
            _ => None,
        }
    }
}

/// Decoded response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded JSON body; `None` for empty bodies such as 204 responses
    pub body: Option<Value>,
}

impl ApiResponse {
    /// Response carrying a JSON body
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// Response without a body
    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the tracker.
///
/// Implementations return every response they receive, successful or not;
/// mapping non-2xx statuses to errors is the caller's job.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Transport backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    tls_verify: bool,
}

impl HttpTransport {
    /// Build the shared client for a validated configuration
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut api_key = HeaderValue::from_str(&config.api_key).map_err(|_| {
            ConfigError::InvalidValue {
                field: "api_key".to_string(),
                value: "<redacted>".to_string(),
                hint: "The API key may only contain visible ASCII characters".to_string(),
            }
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if !config.tls_verify {
            warn!("TLS certificate verification is disabled for {}", config.base_url);
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
            tls_verify: config.tls_verify,
        })
    }

    /// Whether TLS certificates are verified
    pub fn verifies_tls(&self) -> bool {
        self.tls_verify
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, path = %request.path, "sending request");

        let mut builder = self.client.request(request.method.as_reqwest(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Binary { data, content_type }) => {
                builder.header(CONTENT_TYPE, content_type).body(data)
            }
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        debug!(status, len = bytes.len(), "received response");

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiResponse::empty(status));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) => Ok(ApiResponse::json(status, body)),
            Err(e) if (200..300).contains(&status) => Err(RedmineError::Decode(format!(
                "response body is not valid JSON: {e}"
            ))),
            // error pages are often HTML; the status alone is reported
            Err(_) => Ok(ApiResponse::empty(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tls_verification_follows_config() {
        let config = Config::new("https://redmine.example.com", "key");
        let transport = HttpTransport::new(&config).unwrap();
        assert!(transport.verifies_tls());

        let transport = HttpTransport::new(&config.with_tls_verify(false)).unwrap();
        assert!(!transport.verifies_tls());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config::default().with_api_key("key");
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(matches!(err, RedmineError::Config(_)));
    }

    #[test]
    fn test_api_key_with_control_characters_is_rejected() {
        let config = Config::new("https://redmine.example.com", "bad\nkey");
        assert!(HttpTransport::new(&config).is_err());
    }

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::new(Method::Post, "/issues.json")
            .with_query(vec![("include".to_string(), "journals".to_string())])
            .with_json(json!({"issue": {"subject": "x"}}));

        assert_eq!(request.method.to_string(), "POST");
        assert_eq!(request.json_body(), Some(&json!({"issue": {"subject": "x"}})));

        let upload = ApiRequest::new(Method::Post, "/uploads.json")
            .with_binary(vec![1, 2, 3], "application/octet-stream");
        assert_eq!(upload.json_body(), None);
    }

    #[test]
    fn test_response_success_range() {
        assert!(ApiResponse::empty(204).is_success());
        assert!(ApiResponse::json(201, json!({})).is_success());
        assert!(!ApiResponse::empty(404).is_success());
    }
}
