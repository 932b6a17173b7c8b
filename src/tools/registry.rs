//! Tool registry: registration, discovery, and dispatch.
//!
//! The registry is built once at startup, handed to the server as an
//! explicit value, and never mutated afterwards. Dispatch validates
//! arguments against the tool's declared schema, invokes the bound
//! handler, and folds every outcome into an `InvocationResult` so the
//! transport layer always has a well-formed message to send back.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{
    ApiClient, ClustersClient, CommandsClient, LibrariesClient, SqlClient, WorkspaceClient,
};
use crate::tools::clusters::{
    CreateClusterTool, DeleteClusterTool, GetClusterTool, ListClustersTool, ListNodeTypesTool,
    ListSparkVersionsTool, StartClusterTool,
};
use crate::tools::commands::{CreateExecutionContextTool, ExecuteCommandTool, GetCommandStatusTool};
use crate::tools::libraries::InstallLibrariesTool;
use crate::tools::sql::{CreateSqlWarehouseTool, ExecuteSqlStatementTool, ListSqlWarehousesTool};
use crate::tools::types::{InvocationResult, ParamSpec, Tool, ToolDescriptor};
use crate::tools::workspace::{
    CreateWorkspaceDirectoryTool, DeleteWorkspaceObjectTool, GetWorkspaceObjectStatusTool,
    ImportWorkspaceObjectTool,
};

/// Raised when two tools are registered under one name. Startup-only;
/// the registry rejects the registration before any request is accepted.
#[derive(Debug, thiserror::Error)]
#[error("duplicate tool name: {0}")]
pub struct DuplicateToolError(pub String);

/// Immutable mapping from tool name to handler.
pub struct ToolRegistry {
    tools: HashMap<&'static str, Box<dyn Tool>>,
    // Registration order, for stable listing.
    order: Vec<&'static str>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Build the full catalog against one shared API handle.
    pub fn with_catalog(api: Arc<ApiClient>) -> Result<Self, DuplicateToolError> {
        let clusters = ClustersClient::new(api.clone());
        let libraries = LibrariesClient::new(api.clone());
        let commands = CommandsClient::new(api.clone());
        let sql = SqlClient::new(api.clone());
        let workspace = WorkspaceClient::new(api);

        let mut registry = Self::new();

        registry.register(Box::new(ListClustersTool::new(clusters.clone())))?;
        registry.register(Box::new(CreateClusterTool::new(clusters.clone())))?;
        registry.register(Box::new(DeleteClusterTool::new(clusters.clone())))?;
        registry.register(Box::new(StartClusterTool::new(clusters.clone())))?;
        registry.register(Box::new(GetClusterTool::new(clusters.clone())))?;
        registry.register(Box::new(ListNodeTypesTool::new(clusters.clone())))?;
        registry.register(Box::new(ListSparkVersionsTool::new(clusters)))?;

        registry.register(Box::new(InstallLibrariesTool::new(libraries)))?;

        registry.register(Box::new(CreateExecutionContextTool::new(commands.clone())))?;
        registry.register(Box::new(ExecuteCommandTool::new(commands.clone())))?;
        registry.register(Box::new(GetCommandStatusTool::new(commands)))?;

        registry.register(Box::new(ListSqlWarehousesTool::new(sql.clone())))?;
        registry.register(Box::new(CreateSqlWarehouseTool::new(sql.clone())))?;
        registry.register(Box::new(ExecuteSqlStatementTool::new(sql)))?;

        registry.register(Box::new(DeleteWorkspaceObjectTool::new(workspace.clone())))?;
        registry.register(Box::new(GetWorkspaceObjectStatusTool::new(
            workspace.clone(),
        )))?;
        registry.register(Box::new(ImportWorkspaceObjectTool::new(workspace.clone())))?;
        registry.register(Box::new(CreateWorkspaceDirectoryTool::new(workspace)))?;

        Ok(registry)
    }

    /// Add a tool. Names must be unique across the registry.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), DuplicateToolError> {
        let name = tool.descriptor().name;
        if self.tools.contains_key(name) {
            return Err(DuplicateToolError(name.to_string()));
        }
        self.order.push(name);
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Descriptors in registration order, for discovery.
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.descriptor())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Route one invocation. Never fails past this boundary: every
    /// outcome, including unknown names and validation failures, comes
    /// back as an `InvocationResult`.
    pub async fn dispatch(&self, name: &str, args: Value) -> InvocationResult {
        let Some(tool) = self.tools.get(name) else {
            warn!(tool = name, "unknown tool requested");
            return InvocationResult::UnknownTool {
                message: format!("unknown tool: {name}"),
            };
        };

        let descriptor = tool.descriptor();
        let validated = match validate(&descriptor.params, args) {
            Ok(v) => v,
            Err(message) => {
                debug!(tool = name, %message, "parameter validation failed");
                return InvocationResult::InvalidParameters { message };
            }
        };

        debug!(tool = name, "dispatching");
        InvocationResult::from_handler(tool.invoke(validated).await)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check arguments against the declared parameters.
///
/// Required fields must be present; declared fields must coerce to their
/// type; optional fields with defaults are filled in. Fields the schema
/// does not declare pass through untouched, matching the upstream API's
/// tolerance for extra configuration.
fn validate(params: &[ParamSpec], args: Value) -> Result<Value, String> {
    let mut map = match args {
        Value::Object(map) => map,
        Value::Null => serde_json::Map::new(),
        other => {
            return Err(format!(
                "arguments must be an object, got {}",
                json_type_name(&other)
            ))
        }
    };

    for param in params {
        match map.get(param.name) {
            Some(Value::Null) | None => {
                if param.required {
                    return Err(format!("missing required parameter: {}", param.name));
                }
                if let Some(default) = &param.default {
                    map.insert(param.name.to_string(), default.clone());
                }
            }
            Some(value) => match param.param_type.coerce(value) {
                Some(coerced) => {
                    map.insert(param.name.to_string(), coerced);
                }
                None => {
                    return Err(format!(
                        "parameter '{}' expects {}, got {}",
                        param.name,
                        param.param_type.schema_name(),
                        json_type_name(value)
                    ))
                }
            },
        }
    }

    Ok(Value::Object(map))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
