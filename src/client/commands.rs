//! Execution contexts and remote command execution against `/api/1.2/*`.
//!
//! The 1.2 command API predates the snake_case convention used elsewhere:
//! request and response fields are camelCase (`clusterId`, `contextId`).
//! Command execution is asynchronous upstream; `execute` returns the
//! command id immediately and callers poll `status` themselves.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{decode, ApiClient, ApiError};

const CREATE_CONTEXT_ENDPOINT: &str = "/api/1.2/contexts/create";
const EXECUTE_ENDPOINT: &str = "/api/1.2/commands/execute";
const STATUS_ENDPOINT: &str = "/api/1.2/commands/status";

/// Languages the command API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Scala,
    Sql,
}

impl FromStr for Language {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, ApiError> {
        match s.to_ascii_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "scala" => Ok(Language::Scala),
            "sql" => Ok(Language::Sql),
            other => Err(ApiError::InvalidRequest(format!(
                "invalid language '{other}': must be one of python, scala, sql"
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::Scala => write!(f, "scala"),
            Language::Sql => write!(f, "sql"),
        }
    }
}

/// Response to context creation; `id` is the execution context handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextCreated {
    pub id: String,
}

/// Immediate acknowledgment of a submitted command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSubmitted {
    pub id: String,
}

/// Point-in-time command state; `results` is the raw upstream payload
/// since its shape varies by language and output type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandStatus {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
}

/// Typed access to the command execution endpoint family.
#[derive(Clone)]
pub struct CommandsClient {
    api: Arc<ApiClient>,
}

impl CommandsClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn create_context(
        &self,
        cluster_id: &str,
        language: Language,
    ) -> Result<ContextCreated, ApiError> {
        info!(cluster_id, %language, "creating execution context");
        decode(
            self.api
                .post(
                    CREATE_CONTEXT_ENDPOINT,
                    &serde_json::json!({
                        "clusterId": cluster_id,
                        "language": language,
                    }),
                )
                .await?,
        )
    }

    pub async fn execute(
        &self,
        cluster_id: &str,
        context_id: &str,
        language: Language,
        command: &str,
    ) -> Result<CommandSubmitted, ApiError> {
        info!(cluster_id, context_id, %language, "executing command");
        decode(
            self.api
                .post(
                    EXECUTE_ENDPOINT,
                    &serde_json::json!({
                        "clusterId": cluster_id,
                        "contextId": context_id,
                        "language": language,
                        "command": command,
                    }),
                )
                .await?,
        )
    }

    pub async fn status(
        &self,
        cluster_id: &str,
        context_id: &str,
        command_id: &str,
    ) -> Result<CommandStatus, ApiError> {
        decode(
            self.api
                .get(
                    STATUS_ENDPOINT,
                    &[
                        ("clusterId", cluster_id),
                        ("contextId", context_id),
                        ("commandId", command_id),
                    ],
                )
                .await?,
        )
    }
}
