//! Resource operations on top of a [`Transport`]
//!
//! Every operation builds a path from a resource template, attaches query
//! parameters or an enveloped body, and decodes the answer. Non-2xx responses
//! become [`RedmineError::Api`]. No business validation happens here; the
//! tracker is the authority on what it accepts.

use crate::api::path::{render, PathParams};
use crate::api::resource::{self, Resource};
use crate::api::transport::{ApiRequest, HttpTransport, Method, Transport};
use crate::config::Config;
use crate::error::{RedmineError, Result};
use serde_json::{json, Map, Value};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, warn};

/// Client for the tracker's REST API
#[derive(Clone)]
pub struct RedmineClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for RedmineClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedmineClient").finish_non_exhaustive()
    }
}

impl RedmineClient {
    /// Create a client over any transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a client that talks HTTP to the configured instance
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Send a request, turning non-2xx responses into errors
    async fn call(&self, request: ApiRequest) -> Result<Option<Value>> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            warn!(%method, %path, status = response.status, "tracker rejected request");
            return Err(RedmineError::Api {
                status: response.status,
                body: response.body,
            });
        }

        debug!(%method, %path, status = response.status, "request succeeded");
        Ok(response.body)
    }

    async fn call_for_body(&self, request: ApiRequest) -> Result<Value> {
        self.call(request)
            .await?
            .ok_or_else(|| RedmineError::Decode("expected a response body but got none".into()))
    }

    /// GET the collection endpoint of a resource
    pub async fn list(
        &self,
        resource: &Resource,
        params: &PathParams,
        query: Vec<(String, String)>,
    ) -> Result<Value> {
        let path = render(collection(resource)?, params)?;
        self.call_for_body(ApiRequest::new(Method::Get, path).with_query(query))
            .await
    }

    /// GET the member endpoint of a resource
    pub async fn get(
        &self,
        resource: &Resource,
        params: &PathParams,
        query: Vec<(String, String)>,
    ) -> Result<Value> {
        let path = render(member(resource)?, params)?;
        self.call_for_body(ApiRequest::new(Method::Get, path).with_query(query))
            .await
    }

    /// POST `{ <singular>: fields }` to the collection endpoint.
    ///
    /// Most resources answer with the created entity; some, such as project
    /// files, answer 204 without a body.
    pub async fn create(
        &self,
        resource: &Resource,
        params: &PathParams,
        fields: Map<String, Value>,
    ) -> Result<Option<Value>> {
        let path = render(collection(resource)?, params)?;
        let request = ApiRequest::new(Method::Post, path).with_json(envelope(resource, fields));
        self.call(request).await
    }

    /// PUT `{ <singular>: fields }` to the member endpoint
    pub async fn update(
        &self,
        resource: &Resource,
        params: &PathParams,
        fields: Map<String, Value>,
    ) -> Result<()> {
        let path = render(member(resource)?, params)?;
        let request = ApiRequest::new(Method::Put, path).with_json(envelope(resource, fields));
        self.call(request).await.map(|_| ())
    }

    /// DELETE the member endpoint
    pub async fn delete(&self, resource: &Resource, params: &PathParams) -> Result<()> {
        let path = render(member(resource)?, params)?;
        self.call(ApiRequest::new(Method::Delete, path))
            .await
            .map(|_| ())
    }

    /// Archive a project
    pub async fn archive_project(&self, id: impl Display) -> Result<()> {
        self.call(ApiRequest::new(Method::Put, format!("/projects/{id}/archive.json")))
            .await
            .map(|_| ())
    }

    /// Unarchive a project
    pub async fn unarchive_project(&self, id: impl Display) -> Result<()> {
        self.call(ApiRequest::new(Method::Put, format!("/projects/{id}/unarchive.json")))
            .await
            .map(|_| ())
    }

    /// Add a user to a group
    pub async fn add_group_user(&self, group_id: impl Display, user_id: u64) -> Result<()> {
        let request = ApiRequest::new(Method::Post, format!("/groups/{group_id}/users.json"))
            .with_json(json!({ "user_id": user_id }));
        self.call(request).await.map(|_| ())
    }

    /// Remove a user from a group
    pub async fn remove_group_user(&self, group_id: impl Display, user_id: u64) -> Result<()> {
        self.call(ApiRequest::new(
            Method::Delete,
            format!("/groups/{group_id}/users/{user_id}.json"),
        ))
        .await
        .map(|_| ())
    }

    /// Add a watcher to an issue
    pub async fn add_watcher(&self, issue_id: impl Display, user_id: u64) -> Result<()> {
        let request = ApiRequest::new(Method::Post, format!("/issues/{issue_id}/watchers.json"))
            .with_json(json!({ "user_id": user_id }));
        self.call(request).await.map(|_| ())
    }

    /// Remove a watcher from an issue
    pub async fn remove_watcher(&self, issue_id: impl Display, user_id: u64) -> Result<()> {
        self.call(ApiRequest::new(
            Method::Delete,
            format!("/issues/{issue_id}/watchers/{user_id}.json"),
        ))
        .await
        .map(|_| ())
    }

    /// The user the API key belongs to
    pub async fn current_user(&self, query: Vec<(String, String)>) -> Result<Value> {
        self.call_for_body(ApiRequest::new(Method::Get, "/users/current.json").with_query(query))
            .await
    }

    /// Account details of the API key's owner
    pub async fn my_account(&self, query: Vec<(String, String)>) -> Result<Value> {
        self.call_for_body(ApiRequest::new(Method::Get, "/my/account.json").with_query(query))
            .await
    }

    /// A wiki page, optionally at a historical version
    pub async fn get_wiki_page(
        &self,
        project_id: impl Display,
        title: impl Display,
        version: Option<u64>,
        query: Vec<(String, String)>,
    ) -> Result<Value> {
        let path = match version {
            Some(version) => format!("/projects/{project_id}/wiki/{title}/{version}.json"),
            None => format!("/projects/{project_id}/wiki/{title}.json"),
        };
        self.call_for_body(ApiRequest::new(Method::Get, path).with_query(query))
            .await
    }

    /// Create or update a wiki page.
    ///
    /// The tracker answers a creation with the new page and an update with an
    /// empty body.
    pub async fn put_wiki_page(
        &self,
        project_id: impl Display,
        title: impl Display,
        fields: Map<String, Value>,
    ) -> Result<Option<Value>> {
        let params = PathParams::new()
            .with("project_id", project_id)
            .with("title", title);
        let path = render(member(&resource::WIKI_PAGES)?, &params)?;
        let request =
            ApiRequest::new(Method::Put, path).with_json(envelope(&resource::WIKI_PAGES, fields));
        self.call(request).await
    }

    /// Full-text search, scoped to a project when one is given
    pub async fn search(
        &self,
        project: Option<&str>,
        query: Vec<(String, String)>,
    ) -> Result<Value> {
        let path = match project {
            Some(project) => format!("/projects/{project}/search.json"),
            None => "/search.json".to_string(),
        };
        self.call_for_body(ApiRequest::new(Method::Get, path).with_query(query))
            .await
    }

    /// Upload raw file content, returning the `{ "upload": { "token": ... } }` body
    pub async fn upload(
        &self,
        filename: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<Value> {
        let path = collection(&resource::UPLOADS)?;
        let request = ApiRequest::new(Method::Post, path)
            .with_query(vec![("filename".to_string(), filename.to_string())])
            .with_binary(data, content_type);
        self.call_for_body(request).await
    }
}

fn envelope(resource: &Resource, fields: Map<String, Value>) -> Value {
    let mut body = Map::new();
    body.insert(resource.singular.to_string(), Value::Object(fields));
    Value::Object(body)
}

fn collection(resource: &Resource) -> Result<&'static str> {
    resource.collection.ok_or_else(|| {
        RedmineError::Other(format!("{} has no collection endpoint", resource.plural))
    })
}

fn member(resource: &Resource) -> Result<&'static str> {
    resource
        .member
        .ok_or_else(|| RedmineError::Other(format!("{} has no member endpoint", resource.plural)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resource::{FILES, ISSUES, MEMBERSHIPS, PROJECTS, TRACKERS};
    use crate::test_utils::MockTransport;
    use serde_json::json;

    fn client(mock: &Arc<MockTransport>) -> RedmineClient {
        RedmineClient::new(mock.clone())
    }

    #[tokio::test]
    async fn test_list_without_query_sends_no_query() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"files": []}));

        let body = client(&mock)
            .list(&FILES, &PathParams::new().with("project_id", 7), Vec::new())
            .await
            .unwrap();

        assert_eq!(body, json!({"files": []}));
        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/projects/7/files.json");
        assert!(request.query.is_empty());
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_create_wraps_fields_in_envelope() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(201, json!({"issue": {"id": 10, "subject": "Hello"}}));

        let mut fields = Map::new();
        fields.insert("project_id".into(), json!(1));
        fields.insert("subject".into(), json!("Hello"));

        let body = client(&mock)
            .create(&ISSUES, &PathParams::new(), fields)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(body["issue"]["id"], 10);
        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/issues.json");
        assert_eq!(
            request.json_body(),
            Some(&json!({"issue": {"project_id": 1, "subject": "Hello"}}))
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_return_nothing() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_empty(204);
        mock.respond_empty(204);
        let client = client(&mock);
        let params = PathParams::new().with("id", 42);

        let mut fields = Map::new();
        fields.insert("notes".into(), json!("done"));
        client.update(&ISSUES, &params, fields).await.unwrap();
        client.delete(&ISSUES, &params).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].method, Method::Put);
        assert_eq!(requests[0].path, "/issues/42.json");
        assert_eq!(requests[0].json_body(), Some(&json!({"issue": {"notes": "done"}})));
        assert_eq!(requests[1].method, Method::Delete);
        assert_eq!(requests[1].path, "/issues/42.json");
    }

    #[tokio::test]
    async fn test_error_status_becomes_api_error() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(422, json!({"errors": ["Name can't be blank"]}));

        let err = client(&mock)
            .create(&PROJECTS, &PathParams::new(), Map::new())
            .await
            .unwrap_err();

        match err {
            RedmineError::Api { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body, Some(json!({"errors": ["Name can't be blank"]})));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_rejected_without_request() {
        let mock = Arc::new(MockTransport::new());
        let err = client(&mock)
            .get(&TRACKERS, &PathParams::new().with("id", 1), Vec::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("no member endpoint"));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_nested_collection_requires_parent() {
        let mock = Arc::new(MockTransport::new());
        let err = client(&mock)
            .list(&MEMBERSHIPS, &PathParams::new(), Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, RedmineError::Validation(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_resource_actions() {
        let mock = Arc::new(MockTransport::new());
        for _ in 0..6 {
            mock.respond_empty(204);
        }
        let client = client(&mock);

        client.archive_project("demo").await.unwrap();
        client.unarchive_project("demo").await.unwrap();
        client.add_group_user(3, 9).await.unwrap();
        client.remove_group_user(3, 9).await.unwrap();
        client.add_watcher(42, 9).await.unwrap();
        client.remove_watcher(42, 9).await.unwrap();

        let seen: Vec<(Method, String)> = mock
            .requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect();
        assert_eq!(
            seen,
            vec![
                (Method::Put, "/projects/demo/archive.json".to_string()),
                (Method::Put, "/projects/demo/unarchive.json".to_string()),
                (Method::Post, "/groups/3/users.json".to_string()),
                (Method::Delete, "/groups/3/users/9.json".to_string()),
                (Method::Post, "/issues/42/watchers.json".to_string()),
                (Method::Delete, "/issues/42/watchers/9.json".to_string()),
            ]
        );
        assert_eq!(mock.requests()[2].json_body(), Some(&json!({"user_id": 9})));
    }

    #[tokio::test]
    async fn test_wiki_page_version_segment() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"wiki_page": {"title": "Start"}}));
        mock.respond_json(200, json!({"wiki_page": {"title": "Start", "version": 3}}));
        let client = client(&mock);

        client.get_wiki_page("demo", "Start", None, Vec::new()).await.unwrap();
        client
            .get_wiki_page("demo", "Start", Some(3), Vec::new())
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/projects/demo/wiki/Start.json");
        assert_eq!(requests[1].path, "/projects/demo/wiki/Start/3.json");
    }

    #[tokio::test]
    async fn test_put_wiki_page_tolerates_empty_body() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_empty(204);

        let mut fields = Map::new();
        fields.insert("text".into(), json!("h1. Hello"));
        let body = client(&mock)
            .put_wiki_page("demo", "Start", fields)
            .await
            .unwrap();

        assert_eq!(body, None);
        assert_eq!(
            mock.last_request().unwrap().json_body(),
            Some(&json!({"wiki_page": {"text": "h1. Hello"}}))
        );
    }

    #[tokio::test]
    async fn test_search_scoping() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"results": []}));
        mock.respond_json(200, json!({"results": []}));
        let client = client(&mock);
        let query = vec![("q".to_string(), "crash".to_string())];

        client.search(None, query.clone()).await.unwrap();
        client.search(Some("demo"), query).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/search.json");
        assert_eq!(requests[1].path, "/projects/demo/search.json");
        assert_eq!(requests[1].query, vec![("q".to_string(), "crash".to_string())]);
    }

    #[tokio::test]
    async fn test_upload_sends_binary_body() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(201, json!({"upload": {"token": "7.abc"}}));

        let body = client(&mock)
            .upload("log.txt", b"hello".to_vec(), "text/plain")
            .await
            .unwrap();

        assert_eq!(body["upload"]["token"], "7.abc");
        let request = mock.last_request().unwrap();
        assert_eq!(request.path, "/uploads.json");
        assert_eq!(
            request.query,
            vec![("filename".to_string(), "log.txt".to_string())]
        );
        assert_eq!(
            request.body,
            Some(crate::api::transport::RequestBody::Binary {
                data: b"hello".to_vec(),
                content_type: "text/plain".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_current_user_and_account() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"user": {"id": 1, "login": "admin"}}));
        mock.respond_json(200, json!({"user": {"id": 1, "login": "admin"}}));
        let client = client(&mock);

        client
            .current_user(vec![("include".to_string(), "groups".to_string())])
            .await
            .unwrap();
        client.my_account(Vec::new()).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/users/current.json");
        assert_eq!(requests[1].path, "/my/account.json");
    }

    #[tokio::test]
    async fn test_get_with_empty_body_is_decode_error() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_empty(200);

        let err = client(&mock)
            .get(&ISSUES, &PathParams::new().with("id", 1), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RedmineError::Decode(_)));
    }
}
