//! Tools for execution contexts and remote command execution.
//!
//! Command execution is asynchronous upstream: `execute_command` returns
//! the command id immediately and the caller polls `get_command_status`.

use serde_json::Value;

use crate::client::commands::{CommandsClient, Language};
use crate::tools::args::require_str;
use crate::tools::types::{ParamSpec, ParamType, Tool, ToolDescriptor, ToolError};

fn parse_language(args: &Value) -> Result<Language, ToolError> {
    require_str(args, "language")?
        .parse::<Language>()
        .map_err(ToolError::from)
}

pub struct CreateExecutionContextTool {
    commands: CommandsClient,
}

impl CreateExecutionContextTool {
    pub fn new(commands: CommandsClient) -> Self {
        Self { commands }
    }
}

#[async_trait::async_trait]
impl Tool for CreateExecutionContextTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "create_execution_context",
            description: "Create an execution context on a running cluster for sequential command execution",
            params: vec![
                ParamSpec::required(
                    "cluster_id",
                    ParamType::String,
                    "ID of the cluster to create the context on",
                ),
                ParamSpec::required(
                    "language",
                    ParamType::String,
                    "Context language: python, scala or sql",
                ),
            ],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let cluster_id = require_str(&args, "cluster_id")?;
        let language = parse_language(&args)?;
        let context = self.commands.create_context(cluster_id, language).await?;
        Ok(serde_json::json!({ "context_id": context.id }))
    }
}

pub struct ExecuteCommandTool {
    commands: CommandsClient,
}

impl ExecuteCommandTool {
    pub fn new(commands: CommandsClient) -> Self {
        Self { commands }
    }
}

#[async_trait::async_trait]
impl Tool for ExecuteCommandTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "execute_command",
            description: "Submit a command to an execution context; returns the command id to poll with get_command_status",
            params: vec![
                ParamSpec::required(
                    "cluster_id",
                    ParamType::String,
                    "ID of the cluster to run the command on",
                ),
                ParamSpec::required(
                    "context_id",
                    ParamType::String,
                    "Execution context id from create_execution_context",
                ),
                ParamSpec::required(
                    "language",
                    ParamType::String,
                    "Command language: python, scala or sql",
                ),
                ParamSpec::required("command", ParamType::String, "The command to execute"),
            ],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let cluster_id = require_str(&args, "cluster_id")?;
        let context_id = require_str(&args, "context_id")?;
        let command = require_str(&args, "command")?;
        let language = parse_language(&args)?;

        let submitted = self
            .commands
            .execute(cluster_id, context_id, language, command)
            .await?;
        Ok(serde_json::json!({ "command_id": submitted.id }))
    }
}

pub struct GetCommandStatusTool {
    commands: CommandsClient,
}

impl GetCommandStatusTool {
    pub fn new(commands: CommandsClient) -> Self {
        Self { commands }
    }
}

#[async_trait::async_trait]
impl Tool for GetCommandStatusTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_command_status",
            description: "Get the status and results of a previously submitted command",
            params: vec![
                ParamSpec::required(
                    "cluster_id",
                    ParamType::String,
                    "ID of the cluster the command ran on",
                ),
                ParamSpec::required(
                    "context_id",
                    ParamType::String,
                    "Execution context id of the command",
                ),
                ParamSpec::required(
                    "command_id",
                    ParamType::String,
                    "ID of the command to check",
                ),
            ],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let cluster_id = require_str(&args, "cluster_id")?;
        let context_id = require_str(&args, "context_id")?;
        let command_id = require_str(&args, "command_id")?;

        let status = self
            .commands
            .status(cluster_id, context_id, command_id)
            .await?;
        serde_json::to_value(status).map_err(|e| ToolError::InvalidParameters(e.to_string()))
    }
}
