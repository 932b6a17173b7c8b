//! Workspace object management against `/api/2.0/workspace/*`.

use std::sync::Arc;

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{decode, ApiClient, ApiError};

const DELETE_ENDPOINT: &str = "/api/2.0/workspace/delete";
const GET_STATUS_ENDPOINT: &str = "/api/2.0/workspace/get-status";
const IMPORT_ENDPOINT: &str = "/api/2.0/workspace/import";
const MKDIRS_ENDPOINT: &str = "/api/2.0/workspace/mkdirs";

/// Status of a workspace object (notebook, directory, file, library).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStatus {
    pub path: String,
    #[serde(default)]
    pub object_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<i64>,
}

/// Parameters for importing an object into the workspace.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub path: String,
    /// Raw or base64 content; encoded on the way out if needed.
    pub content: String,
    /// SOURCE, HTML, JUPYTER or DBC.
    pub format: String,
    pub language: Option<String>,
    pub overwrite: bool,
}

/// Typed access to the workspace endpoint family.
#[derive(Clone)]
pub struct WorkspaceClient {
    api: Arc<ApiClient>,
}

impl WorkspaceClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn delete(&self, path: &str, recursive: bool) -> Result<Value, ApiError> {
        info!(path, recursive, "deleting workspace object");
        self.api
            .post(
                DELETE_ENDPOINT,
                &serde_json::json!({ "path": path, "recursive": recursive }),
            )
            .await
    }

    pub async fn get_status(&self, path: &str) -> Result<ObjectStatus, ApiError> {
        decode(self.api.get(GET_STATUS_ENDPOINT, &[("path", path)]).await?)
    }

    pub async fn import(&self, request: &ImportRequest) -> Result<Value, ApiError> {
        info!(path = %request.path, format = %request.format, "importing workspace object");

        // The upstream API wants base64; callers may hand us either form.
        let content = if is_base64(&request.content) {
            request.content.clone()
        } else {
            base64::engine::general_purpose::STANDARD.encode(request.content.as_bytes())
        };

        let mut body = serde_json::Map::new();
        body.insert("path".to_string(), request.path.clone().into());
        body.insert("content".to_string(), content.into());
        body.insert("format".to_string(), request.format.clone().into());
        body.insert("overwrite".to_string(), request.overwrite.into());
        if let Some(language) = &request.language {
            body.insert("language".to_string(), language.clone().into());
        }

        self.api.post(IMPORT_ENDPOINT, &Value::Object(body)).await
    }

    pub async fn mkdirs(&self, path: &str) -> Result<Value, ApiError> {
        info!(path, "creating workspace directory");
        self.api
            .post(MKDIRS_ENDPOINT, &serde_json::json!({ "path": path }))
            .await
    }
}

/// Whether a string already looks like (and decodes as) standard base64.
fn is_base64(content: &str) -> bool {
    if content.is_empty() || content.len() % 4 != 0 {
        return false;
    }
    let padding = content.chars().rev().take_while(|c| *c == '=').count();
    if padding > 2 {
        return false;
    }
    let body_ok = content[..content.len() - padding]
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/');
    body_ok
        && base64::engine::general_purpose::STANDARD
            .decode(content)
            .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_base64_content() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("print('hello')");
        assert!(is_base64(&encoded));
    }

    #[test]
    fn rejects_plain_source_text() {
        assert!(!is_base64("print('hello world')"));
        assert!(!is_base64(""));
        assert!(!is_base64("abc==="));
    }
}
