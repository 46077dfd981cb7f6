//! Test utilities shared by unit and integration tests
//!
//! [`MockTransport`] stands in for the tracker: it replays queued responses in
//! order and records every request it was asked to send, so tests can assert
//! on the exact method, path, query and body without any network.
//!
//! ```
//! use redmine_mcp::test_utils::MockTransport;
//! use serde_json::json;
//!
//! let mock = MockTransport::new();
//! mock.respond_json(200, json!({"issues": []}));
//! assert!(mock.requests().is_empty());
//! ```

use crate::api::transport::{ApiRequest, ApiResponse, Transport};
use crate::error::{RedmineError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

enum Reply {
    Response(ApiResponse),
    Failure(String),
}

/// Transport that replays scripted responses and records requests
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    /// Create a mock with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, reply: Reply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Queue a response with a JSON body
    pub fn respond_json(&self, status: u16, body: Value) {
        self.push(Reply::Response(ApiResponse::json(status, body)));
    }

    /// Queue a response without a body
    pub fn respond_empty(&self, status: u16) {
        self.push(Reply::Response(ApiResponse::empty(status)));
    }

    /// Queue a failure to reach the tracker at all
    pub fn fail(&self, message: impl Into<String>) {
        self.push(Reply::Failure(message.into()));
    }

    /// Every request sent so far, oldest first
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests().pop()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Failure(message)) => Err(RedmineError::Other(message)),
            None => Err(RedmineError::Other(
                "MockTransport has no response queued".to_string(),
            )),
        }
    }
}
