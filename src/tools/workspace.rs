//! Tools for workspace object management.

use serde_json::Value;

use crate::client::workspace::{ImportRequest, WorkspaceClient};
use crate::tools::args::{optional_bool, optional_str, require_str};
use crate::tools::types::{ParamSpec, ParamType, Tool, ToolDescriptor, ToolError};

pub struct DeleteWorkspaceObjectTool {
    workspace: WorkspaceClient,
}

impl DeleteWorkspaceObjectTool {
    pub fn new(workspace: WorkspaceClient) -> Self {
        Self { workspace }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteWorkspaceObjectTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "delete_workspace_object",
            description: "Delete a notebook, file or directory from the workspace",
            params: vec![
                ParamSpec::required(
                    "path",
                    ParamType::String,
                    "Absolute workspace path of the object to delete",
                ),
                ParamSpec::optional(
                    "recursive",
                    ParamType::Boolean,
                    "Also delete directory contents",
                )
                .with_default(Value::Bool(false)),
            ],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let path = require_str(&args, "path")?;
        let recursive = optional_bool(&args, "recursive").unwrap_or(false);
        self.workspace.delete(path, recursive).await?;
        Ok(serde_json::json!({ "path": path, "deleted": true }))
    }
}

pub struct GetWorkspaceObjectStatusTool {
    workspace: WorkspaceClient,
}

impl GetWorkspaceObjectStatusTool {
    pub fn new(workspace: WorkspaceClient) -> Self {
        Self { workspace }
    }
}

#[async_trait::async_trait]
impl Tool for GetWorkspaceObjectStatusTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_workspace_object_status",
            description: "Get type and metadata of a workspace object",
            params: vec![ParamSpec::required(
                "path",
                ParamType::String,
                "Absolute workspace path of the object",
            )],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let path = require_str(&args, "path")?;
        let status = self.workspace.get_status(path).await?;
        serde_json::to_value(status).map_err(|e| ToolError::InvalidParameters(e.to_string()))
    }
}

pub struct ImportWorkspaceObjectTool {
    workspace: WorkspaceClient,
}

impl ImportWorkspaceObjectTool {
    pub fn new(workspace: WorkspaceClient) -> Self {
        Self { workspace }
    }
}

#[async_trait::async_trait]
impl Tool for ImportWorkspaceObjectTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "import_workspace_object",
            description: "Import a notebook or file into the workspace. Content may be raw \
                          source or base64; it is encoded on the way out if needed",
            params: vec![
                ParamSpec::required(
                    "path",
                    ParamType::String,
                    "Absolute workspace path to import to",
                ),
                ParamSpec::required("content", ParamType::String, "Object content"),
                ParamSpec::optional(
                    "format",
                    ParamType::String,
                    "SOURCE, HTML, JUPYTER or DBC",
                )
                .with_default(Value::from("SOURCE")),
                ParamSpec::optional("language", ParamType::String, "PYTHON, SCALA, SQL or R"),
                ParamSpec::optional(
                    "overwrite",
                    ParamType::Boolean,
                    "Overwrite an existing object at the path",
                )
                .with_default(Value::Bool(false)),
            ],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let request = ImportRequest {
            path: require_str(&args, "path")?.to_string(),
            content: require_str(&args, "content")?.to_string(),
            format: optional_str(&args, "format").unwrap_or("SOURCE").to_string(),
            language: optional_str(&args, "language").map(str::to_string),
            overwrite: optional_bool(&args, "overwrite").unwrap_or(false),
        };
        self.workspace.import(&request).await?;
        Ok(serde_json::json!({ "path": request.path, "imported": true }))
    }
}

pub struct CreateWorkspaceDirectoryTool {
    workspace: WorkspaceClient,
}

impl CreateWorkspaceDirectoryTool {
    pub fn new(workspace: WorkspaceClient) -> Self {
        Self { workspace }
    }
}

#[async_trait::async_trait]
impl Tool for CreateWorkspaceDirectoryTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "create_workspace_directory",
            description: "Create a workspace directory, including missing parents",
            params: vec![ParamSpec::required(
                "path",
                ParamType::String,
                "Absolute workspace path of the directory to create",
            )],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let path = require_str(&args, "path")?;
        self.workspace.mkdirs(path).await?;
        Ok(serde_json::json!({ "path": path, "created": true }))
    }
}
