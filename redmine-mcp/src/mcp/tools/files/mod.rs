//! Project file, attachment and upload tools

use super::{id_or_identifier_property, id_property, object_schema, register_all};
use crate::api::resource::{ATTACHMENTS, FILES, UPLOADS};
use crate::api::RedmineClient;
use crate::error::{RedmineError, Result};
use crate::mcp::endpoint::{crud_tools, CrudSpec, EndpointTool, OutputShape, VerbSpec};
use crate::mcp::tool_registry::ToolRegistry;
use base64::Engine;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Content type sent when the caller does not name one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

fn upload_tool() -> Result<EndpointTool> {
    EndpointTool::new(
        "attachments_upload",
        "Uploads file content and returns a token. Pass the token in 'uploads' when creating or updating an issue, or to files_create.",
        object_schema(
            vec![
                ("filename", json!({"type": "string", "minLength": 1, "description": "Name of the uploaded file."})),
                ("content", json!({"type": "string", "description": "The file content, base64 encoded."})),
                ("content_type", json!({"type": "string", "description": "MIME type of the content. Defaults to application/octet-stream."})),
            ],
            &["filename", "content"],
        ),
        "upload {filename}",
        OutputShape::Entity(UPLOADS.singular),
        |client: Arc<RedmineClient>, args: Map<String, Value>| async move {
            let filename = args.get("filename").and_then(Value::as_str).unwrap_or_default();
            let encoded = args.get("content").and_then(Value::as_str).unwrap_or_default();
            let content_type = args
                .get("content_type")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_CONTENT_TYPE);

            let data = base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .map_err(|e| RedmineError::validation(format!("content is not valid base64: {e}")))?;

            client.upload(filename, data, content_type).await.map(Some)
        },
    )
}

/// Build every file and attachment tool
pub fn file_tools() -> Result<Vec<EndpointTool>> {
    let mut tools = crud_tools(
        FILES,
        CrudSpec::new("files")
            .nested_under("project_id")
            .list(VerbSpec::new(
                "Retrieves the files published in a project's Files section.",
                object_schema(
                    vec![(
                        "project_id",
                        id_or_identifier_property("The ID or identifier of the project to list files for."),
                    )],
                    &["project_id"],
                ),
            ))
            .create(VerbSpec::new(
                "Publishes a previously uploaded file in a project's Files section.",
                object_schema(
                    vec![
                        ("project_id", id_or_identifier_property("The ID or identifier of the project.")),
                        ("token", json!({"type": "string", "minLength": 1, "description": "Token returned by attachments_upload."})),
                        ("version_id", json!({"type": "integer", "description": "Version the file belongs to."})),
                        ("filename", json!({"type": "string", "description": "Overrides the uploaded file name."})),
                        ("description", json!({"type": "string", "description": "A short description of the file."})),
                    ],
                    &["project_id", "token"],
                ),
            )),
    )?;

    tools.extend(crud_tools(
        ATTACHMENTS,
        CrudSpec::new("attachments")
            .get(VerbSpec::new(
                "Retrieves the details of an attachment, including its download URL.",
                object_schema(vec![("id", id_property("The numeric ID of the attachment."))], &["id"]),
            ))
            .delete(VerbSpec::new(
                "Deletes an attachment.",
                super::id_only_schema("The numeric ID of the attachment to delete."),
            )),
    )?);

    tools.push(upload_tool()?);
    Ok(tools)
}

/// Register all file-related tools with the registry
pub fn register_file_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_all(registry, file_tools()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, RequestBody};
    use crate::mcp::tool_registry::ToolOutcome;
    use crate::mcp::tools::test_support::{find, run};
    use crate::test_utils::MockTransport;

    #[tokio::test]
    async fn test_list_files_sends_no_query() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(200, json!({"files": [{"id": 1, "filename": "a.pdf"}]}));
        let tools = file_tools().unwrap();

        let outcome = run(find(&tools, "files_list"), &mock, json!({"project_id": 7})).await;

        assert!(outcome.is_success());
        let request = mock.last_request().unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/projects/7/files.json");
        assert!(request.query.is_empty());
    }

    #[tokio::test]
    async fn test_files_create_envelope() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_empty(204);
        let tools = file_tools().unwrap();

        let outcome = run(
            find(&tools, "files_create"),
            &mock,
            json!({"project_id": "demo", "token": "7.abc", "description": "Release notes"}),
        )
        .await;

        assert_eq!(
            outcome,
            ToolOutcome::done("create file for project demo succeeded")
        );
        let request = mock.last_request().unwrap();
        assert_eq!(request.path, "/projects/demo/files.json");
        assert_eq!(
            request.json_body(),
            Some(&json!({"file": {"token": "7.abc", "description": "Release notes"}}))
        );
    }

    #[tokio::test]
    async fn test_upload_decodes_content() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(201, json!({"upload": {"id": 3, "token": "3.ed32"}}));
        let tools = file_tools().unwrap();

        let outcome = run(
            find(&tools, "attachments_upload"),
            &mock,
            json!({"filename": "notes.txt", "content": "aGVsbG8=", "content_type": "text/plain"}),
        )
        .await;

        let payload: Value = serde_json::from_str(&outcome.text()).unwrap();
        assert_eq!(payload["token"], "3.ed32");

        let request = mock.last_request().unwrap();
        assert_eq!(request.path, "/uploads.json");
        assert_eq!(
            request.query,
            vec![("filename".to_string(), "notes.txt".to_string())]
        );
        match request.body {
            Some(RequestBody::Binary { data, content_type }) => {
                assert_eq!(data, b"hello".to_vec());
                assert_eq!(content_type, "text/plain");
            }
            other => panic!("expected binary body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_base64() {
        let mock = Arc::new(MockTransport::new());
        let tools = file_tools().unwrap();

        let outcome = run(
            find(&tools, "attachments_upload"),
            &mock,
            json!({"filename": "x.bin", "content": "not base64!"}),
        )
        .await;

        assert!(matches!(outcome, ToolOutcome::Failure { ref error } if error.contains("not valid base64")));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_attachment_delete() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_empty(204);
        let tools = file_tools().unwrap();

        let outcome = run(find(&tools, "attachments_delete"), &mock, json!({"id": "12"})).await;

        assert_eq!(outcome, ToolOutcome::done("Attachment 12 deleted successfully."));
        assert_eq!(mock.last_request().unwrap().path, "/attachments/12.json");
    }
}
