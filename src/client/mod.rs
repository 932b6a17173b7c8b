//! Authenticated HTTP access to the Databricks REST API.
//!
//! `ApiClient` owns the workspace base URL, the bearer token, and one
//! `reqwest::Client` reused for every call (connection pooling comes for
//! free). The resource clients in the submodules wrap individual endpoint
//! families with typed request/response shapes:
//!
//! - `clusters`: cluster lifecycle and catalog lookups
//! - `libraries`: library installation
//! - `commands`: execution contexts and remote command execution
//! - `sql`: SQL warehouses and statement execution
//! - `workspace`: workspace object import/delete/status
//!
//! No call is retried and no async operation is polled to completion here.
//! These are control-plane endpoints where a blind retry of a create or
//! delete can duplicate work; errors propagate to the caller instead.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error};

pub mod clusters;
pub mod commands;
pub mod libraries;
pub mod sql;
pub mod workspace;


pub use clusters::ClustersClient;
pub use commands::CommandsClient;
pub use libraries::LibrariesClient;
pub use sql::SqlClient;
pub use workspace::WorkspaceClient;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from upstream API calls, normalized for the dispatch layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request reached the platform and was rejected.
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },
    /// The request never got an answer (network, DNS, TLS, timeout).
    #[error("transport failure: {0}")]
    Transport(String),
    /// A 2xx response whose body could not be decoded.
    #[error("invalid response body (status {status}): {message}")]
    InvalidResponse { status: u16, message: String },
    /// The request was rejected before any HTTP call was made.
    #[error("{0}")]
    InvalidRequest(String),
}

/// Shared, immutable handle to the workspace API.
///
/// Constructed once at startup and shared read-only by every resource
/// client for the process lifetime.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(host: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: host.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// GET with query parameters, returning the decoded JSON body.
    pub async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let request = self.http.get(self.url(endpoint)).query(query);
        self.execute(endpoint, request).await
    }

    /// POST a JSON body, returning the decoded JSON response.
    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, ApiError> {
        let request = self.http.post(self.url(endpoint)).json(body);
        self.execute(endpoint, request).await
    }

    async fn execute(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, ApiError> {
        debug!(endpoint, "sending request");

        let response = request
            .bearer_auth(&self.token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!(endpoint, status = status.as_u16(), "request completed");

        if !status.is_success() {
            let message = upstream_message(&text);
            error!(endpoint, status = status.as_u16(), %message, "upstream error");
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        // Several endpoints (delete, start, mkdirs) acknowledge with an
        // empty body.
        if text.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse {
            status: status.as_u16(),
            message: e.to_string(),
        })
    }
}

/// Pull the `message` field out of an upstream error body, falling back to
/// the raw body when it is not the usual JSON shape.
fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        _ => body.to_string(),
    }
}

/// Deserialize a successful upstream response into a typed record.
fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse {
        status: 200,
        message: e.to_string(),
    })
}
