//! Full-text search tool
//!
//! The tracker treats any present search flag as enabled, so `false` flags
//! are left out of the query and `true` flags are sent as `1`.

use super::{object_schema, pagination_properties, register_all};
use crate::api::query::{self, scalar_text};
use crate::api::RedmineClient;
use crate::error::Result;
use crate::mcp::endpoint::{EndpointTool, OutputShape};
use crate::mcp::tool_registry::ToolRegistry;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Flags narrowing how the query is matched
const MATCH_FLAGS: [(&str, &str); 3] = [
    ("all_words", "Require every word of the query to match."),
    ("titles_only", "Only match titles."),
    ("open_issues", "Only match open issues."),
];

/// Flags selecting which kinds of results to include
const RESULT_FLAGS: [(&str, &str); 8] = [
    ("issues", "Include issues."),
    ("news", "Include news."),
    ("documents", "Include documents."),
    ("changesets", "Include changesets."),
    ("wiki_pages", "Include wiki pages."),
    ("messages", "Include forum messages."),
    ("projects", "Include projects."),
    ("attachments", "Include attachments."),
];

fn search_schema() -> Value {
    let mut properties = vec![
        ("q", json!({"type": "string", "minLength": 1, "description": "The search text."})),
        ("project", json!({"type": ["string", "integer"], "description": "Restrict the search to this project (ID or identifier)."})),
        ("scope", json!({"type": "string", "enum": ["all", "my_projects", "subprojects"], "description": "Which projects to search: all, my_projects, or subprojects of the given project."})),
    ];
    for &(flag, description) in MATCH_FLAGS.iter().chain(RESULT_FLAGS.iter()) {
        properties.push((flag, json!({"type": "boolean", "description": description})));
    }
    properties.extend(pagination_properties());
    object_schema(properties, &["q"])
}

/// Query pairs for a search, with flags reduced to the tracker's presence form
pub fn search_query(args: &Map<String, Value>) -> Vec<(String, String)> {
    let mut plain = Map::new();
    let mut flags = Vec::new();

    for (key, value) in args {
        match value {
            Value::Bool(true) => flags.push((key.clone(), "1".to_string())),
            Value::Bool(false) => {}
            _ if key == "project" => {}
            _ => {
                plain.insert(key.clone(), value.clone());
            }
        }
    }

    let mut pairs = query::encode(&plain, &[]);
    pairs.extend(flags);
    pairs
}

/// Build the search tool
pub fn search_tools() -> Result<Vec<EndpointTool>> {
    let search = EndpointTool::new(
        "search",
        "Searches issues, wiki pages, news, documents and other content. Returns matching results with pagination.",
        search_schema(),
        "search for {q}",
        OutputShape::List("results"),
        |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            let project = args.get("project").and_then(scalar_text);
            client
                .search(project.as_deref(), search_query(&args))
                .await
                .map(Some)
        },
    )?;

    Ok(vec![search])
}

/// Register the search tool with the registry
pub fn register_search_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, search_tools()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tool_registry::ToolOutcome;
    use crate::mcp::tools::test_support::{find, run};
    use crate::test_utils::MockTransport;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_search_query_flags() {
        let args = json!({"q": "crash", "project": "demo", "titles_only": true, "news": false, "limit": 5});
        let pairs = search_query(args.as_object().unwrap());

        assert!(pairs.contains(&pair("q", "crash")));
        assert!(pairs.contains(&pair("titles_only", "1")));
        assert!(pairs.contains(&pair("limit", "5")));
        assert!(!pairs.iter().any(|(k, _)| k == "news" || k == "project"));
        assert_eq!(pairs.len(), 3);
    }

    #[tokio::test]
    async fn test_project_scoped_search() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(
            200,
            json!({
                "results": [{"id": 1, "title": "Bug #1: crash", "type": "issue", "url": "/issues/1"}],
                "total_count": 1,
                "offset": 0,
                "limit": 25
            }),
        );
        let tools = search_tools().unwrap();

        let outcome = run(
            find(&tools, "search"),
            &mock,
            json!({"q": "crash", "project": "demo", "issues": "true"}),
        )
        .await;

        let payload: Value = serde_json::from_str(&outcome.text()).unwrap();
        assert_eq!(payload["results"][0]["type"], "issue");
        assert_eq!(payload["total_count"], 1);
        let request = mock.last_request().unwrap();
        assert_eq!(request.path, "/projects/demo/search.json");
        assert!(request.query.contains(&pair("issues", "1")));
    }

    #[tokio::test]
    async fn test_global_search() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"results": [], "total_count": 0, "offset": 0, "limit": 25}));
        let tools = search_tools().unwrap();

        run(find(&tools, "search"), &mock, json!({"q": "crash"})).await;

        assert_eq!(mock.last_request().unwrap().path, "/search.json");
    }

    #[tokio::test]
    async fn test_query_is_required() {
        let mock = Arc::new(MockTransport::new());
        let tools = search_tools().unwrap();

        let outcome = run(find(&tools, "search"), &mock, json!({"scope": "all"})).await;

        assert!(matches!(outcome, ToolOutcome::Failure { ref error } if error.starts_with("Failed to search for: Invalid arguments:")));
        assert!(mock.requests().is_empty());
    }
}
