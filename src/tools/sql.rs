//! Tools for SQL warehouses and statement execution.

use serde_json::Value;

use crate::client::sql::{SqlClient, WarehouseSpec};
use crate::tools::args::{optional_str, optional_u32, optional_u64, require_str};
use crate::tools::types::{ParamSpec, ParamType, Tool, ToolDescriptor, ToolError};

pub struct ListSqlWarehousesTool {
    sql: SqlClient,
}

impl ListSqlWarehousesTool {
    pub fn new(sql: SqlClient) -> Self {
        Self { sql }
    }
}

#[async_trait::async_trait]
impl Tool for ListSqlWarehousesTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "list_sql_warehouses",
            description: "List all SQL warehouses in the workspace",
            params: vec![],
        }
    }

    async fn invoke(&self, _args: Value) -> Result<Value, ToolError> {
        let list = self.sql.list_warehouses().await?;
        Ok(serde_json::json!({ "warehouses": list.warehouses }))
    }
}

pub struct CreateSqlWarehouseTool {
    sql: SqlClient,
}

impl CreateSqlWarehouseTool {
    pub fn new(sql: SqlClient) -> Self {
        Self { sql }
    }
}

#[async_trait::async_trait]
impl Tool for CreateSqlWarehouseTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "create_sql_warehouse",
            description: "Create a new SQL warehouse",
            params: vec![
                ParamSpec::required("name", ParamType::String, "Name of the warehouse"),
                ParamSpec::required(
                    "cluster_size",
                    ParamType::String,
                    "Cluster size, 2X-Small through 4X-Large",
                ),
                ParamSpec::optional("min_num_clusters", ParamType::Integer, "Minimum cluster count")
                    .with_default(Value::from(1)),
                ParamSpec::optional("max_num_clusters", ParamType::Integer, "Maximum cluster count")
                    .with_default(Value::from(1)),
                ParamSpec::optional(
                    "auto_stop_mins",
                    ParamType::Integer,
                    "Minutes of inactivity before the warehouse stops",
                )
                .with_default(Value::from(120)),
                ParamSpec::optional("enable_photon", ParamType::Boolean, "Enable Photon acceleration")
                    .with_default(Value::from(true)),
                ParamSpec::optional(
                    "warehouse_type",
                    ParamType::String,
                    "PRO or CLASSIC",
                )
                .with_default(Value::from("PRO")),
                ParamSpec::optional(
                    "spot_instance_policy",
                    ParamType::String,
                    "Spot instance policy",
                )
                .with_default(Value::from("COST_OPTIMIZED")),
                ParamSpec::optional(
                    "channel",
                    ParamType::String,
                    "Release channel (CHANNEL_NAME_CURRENT or CHANNEL_NAME_PREVIEW)",
                ),
                ParamSpec::optional("tags", ParamType::Object, "Resource tags"),
            ],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let mut spec = WarehouseSpec::new(
            require_str(&args, "name")?,
            require_str(&args, "cluster_size")?,
        );
        if let Some(v) = optional_u32(&args, "min_num_clusters")? {
            spec.min_num_clusters = v;
        }
        if let Some(v) = optional_u32(&args, "max_num_clusters")? {
            spec.max_num_clusters = v;
        }
        if let Some(v) = optional_u32(&args, "auto_stop_mins")? {
            spec.auto_stop_mins = v;
        }
        if let Some(v) = args.get("enable_photon").and_then(Value::as_bool) {
            spec.enable_photon = v;
        }
        if let Some(v) = optional_str(&args, "warehouse_type") {
            spec.warehouse_type = v.to_string();
        }
        if let Some(v) = optional_str(&args, "spot_instance_policy") {
            spec.spot_instance_policy = v.to_string();
        }
        spec.channel = optional_str(&args, "channel").map(str::to_string);
        if let Some(tags) = args.get("tags").cloned() {
            spec.tags = serde_json::from_value(tags)
                .map_err(|e| ToolError::InvalidParameters(format!("tags: {e}")))?;
        }

        let created = self.sql.create_warehouse(&spec).await?;
        Ok(serde_json::json!({ "warehouse_id": created.id }))
    }
}

pub struct ExecuteSqlStatementTool {
    sql: SqlClient,
}

impl ExecuteSqlStatementTool {
    pub fn new(sql: SqlClient) -> Self {
        Self { sql }
    }
}

#[async_trait::async_trait]
impl Tool for ExecuteSqlStatementTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "execute_sql_statement",
            description: "Execute a SQL statement on a SQL warehouse and return inline results",
            params: vec![
                ParamSpec::required(
                    "warehouse_id",
                    ParamType::String,
                    "ID of the SQL warehouse to use",
                ),
                ParamSpec::required("statement", ParamType::String, "The SQL statement to execute"),
                ParamSpec::optional("catalog", ParamType::String, "Catalog to resolve names against"),
                ParamSpec::optional("schema", ParamType::String, "Schema to resolve names against"),
                ParamSpec::optional(
                    "wait_timeout",
                    ParamType::Integer,
                    "Seconds to wait for completion before returning asynchronously",
                ),
            ],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let response = self
            .sql
            .execute_statement(
                require_str(&args, "warehouse_id")?,
                require_str(&args, "statement")?,
                optional_str(&args, "catalog"),
                optional_str(&args, "schema"),
                optional_u64(&args, "wait_timeout")?,
            )
            .await?;
        serde_json::to_value(response).map_err(|e| ToolError::InvalidParameters(e.to_string()))
    }
}
