//! Wiki page tools
//!
//! Wiki pages are addressed by project and title rather than by numeric ID,
//! so these tools are assembled by hand instead of through `crud_tools`.

use super::{id_or_identifier_property, object_schema, register_all};
use crate::api::query::{self, scalar_text};
use crate::api::resource::WIKI_PAGES;
use crate::api::RedmineClient;
use crate::error::Result;
use crate::mcp::endpoint::{body_fields, path_params, EndpointTool, OutputShape};
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const PAGE_KEYS: [&str; 2] = ["project_id", "title"];

fn project_property() -> Value {
    id_or_identifier_property("The ID or identifier of the project.")
}

fn title_property(description: &str) -> Value {
    json!({"type": "string", "minLength": 1, "description": description})
}

fn page_ref(args: &Map<String, Value>) -> (String, String) {
    let project = args.get("project_id").and_then(scalar_text).unwrap_or_default();
    let title = args.get("title").and_then(scalar_text).unwrap_or_default();
    (project, title)
}

/// Build every wiki page tool
pub fn wiki_page_tools() -> Result<Vec<EndpointTool>> {
    let list = EndpointTool::new(
        "wiki_pages_list",
        "Retrieves the index of all wiki pages of a project.",
        object_schema(vec![("project_id", project_property())], &["project_id"]),
        "list wiki pages for project {project_id}",
        OutputShape::List(WIKI_PAGES.plural),
        |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            let params = path_params(&args, &["project_id"]);
            client.list(&WIKI_PAGES, &params, Vec::new()).await.map(Some)
        },
    )?;

    let get = EndpointTool::new(
        "wiki_pages_get",
        "Retrieves a wiki page, optionally at an older version.",
        object_schema(
            vec![
                ("project_id", project_property()),
                ("title", title_property("The title of the wiki page.")),
                ("version", json!({"type": "integer", "minimum": 1, "description": "The version of the page to retrieve."})),
                ("include", json!({"type": "string", "description": "Comma-separated associations to include, e.g. 'attachments'."})),
            ],
            &["project_id", "title"],
        ),
        "retrieve wiki page {title} in project {project_id}",
        OutputShape::Entity(WIKI_PAGES.singular),
        |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            let (project, title) = page_ref(&args);
            let version = args.get("version").and_then(Value::as_u64);
            let query = query::encode(&args, &["project_id", "title", "version"]);
            client
                .get_wiki_page(project, title, version, query)
                .await
                .map(Some)
        },
    )?;

    let put = EndpointTool::new(
        "wiki_pages_create_or_update",
        "Creates a wiki page, or updates it when the title already exists.",
        object_schema(
            vec![
                ("project_id", project_property()),
                ("title", title_property("The title of the wiki page.")),
                ("text", json!({"type": "string", "description": "The page content."})),
                ("comments", json!({"type": "string", "description": "Comment stored with this revision."})),
                ("version", json!({"type": "integer", "description": "Version the edit is based on; the update is refused if the page changed since."})),
                ("parent_title", json!({"type": "string", "description": "Title of the parent page."})),
            ],
            &["project_id", "title", "text"],
        ),
        "create or update wiki page {title} in project {project_id}",
        OutputShape::Entity(WIKI_PAGES.singular),
        |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            let (project, title) = page_ref(&args);
            client
                .put_wiki_page(project, title, body_fields(&args, &PAGE_KEYS))
                .await
        },
    )?;

    let delete = EndpointTool::new(
        "wiki_pages_delete",
        "Deletes a wiki page together with its history and child pages.",
        object_schema(
            vec![
                ("project_id", project_property()),
                ("title", title_property("The title of the wiki page to delete.")),
            ],
            &["project_id", "title"],
        ),
        "delete wiki page {title} in project {project_id}",
        OutputShape::Message("Wiki page {title} deleted successfully.".to_string()),
        |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            let params = path_params(&args, &PAGE_KEYS);
            client.delete(&WIKI_PAGES, &params).await.map(|_| None)
        },
    )?;

    Ok(vec![list, get, put, delete])
}

/// Register all wiki page tools with the registry
pub fn register_wiki_page_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, wiki_page_tools()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::mcp::tool_registry::ToolOutcome;
    use crate::mcp::tools::test_support::{find, run};
    use crate::test_utils::MockTransport;

    #[tokio::test]
    async fn test_get_historical_version() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"wiki_page": {"title": "Start", "version": 2}}));
        let tools = wiki_page_tools().unwrap();

        let outcome = run(
            find(&tools, "wiki_pages_get"),
            &mock,
            json!({"project_id": "demo", "title": "Start", "version": 2}),
        )
        .await;

        let payload: Value = serde_json::from_str(&outcome.text()).unwrap();
        assert_eq!(payload["version"], 2);
        let request = mock.last_request().unwrap();
        assert_eq!(request.path, "/projects/demo/wiki/Start/2.json");
        assert!(request.query.is_empty());
    }

    #[tokio::test]
    async fn test_update_with_empty_reply() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_empty(204);
        let tools = wiki_page_tools().unwrap();

        let outcome = run(
            find(&tools, "wiki_pages_create_or_update"),
            &mock,
            json!({"project_id": 1, "title": "Start", "text": "h1. Hello", "comments": "typo"}),
        )
        .await;

        assert_eq!(
            outcome,
            ToolOutcome::done("create or update wiki page Start in project 1 succeeded")
        );
        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "/projects/1/wiki/Start.json");
        assert_eq!(
            request.json_body(),
            Some(&json!({"wiki_page": {"text": "h1. Hello", "comments": "typo"}}))
        );
    }

    #[tokio::test]
    async fn test_create_returns_page() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(201, json!({"wiki_page": {"title": "New", "version": 1}}));
        let tools = wiki_page_tools().unwrap();

        let outcome = run(
            find(&tools, "wiki_pages_create_or_update"),
            &mock,
            json!({"project_id": 1, "title": "New", "text": "body"}),
        )
        .await;

        let payload: Value = serde_json::from_str(&outcome.text()).unwrap();
        assert_eq!(payload, json!({"title": "New", "version": 1}));
    }

    #[tokio::test]
    async fn test_missing_text_is_rejected() {
        let mock = Arc::new(MockTransport::new());
        let tools = wiki_page_tools().unwrap();

        let outcome = run(
            find(&tools, "wiki_pages_create_or_update"),
            &mock,
            json!({"project_id": 1, "title": "New"}),
        )
        .await;

        assert!(!outcome.is_success());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_empty(200);
        let tools = wiki_page_tools().unwrap();

        let outcome = run(
            find(&tools, "wiki_pages_delete"),
            &mock,
            json!({"project_id": "demo", "title": "Old"}),
        )
        .await;

        assert_eq!(outcome, ToolOutcome::done("Wiki page Old deleted successfully."));
        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.path, "/projects/demo/wiki/Old.json");
    }
}
