//! SQL warehouses and statement execution against `/api/2.0/sql/*`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{decode, ApiClient, ApiError};

const WAREHOUSES_ENDPOINT: &str = "/api/2.0/sql/warehouses";
const STATEMENTS_ENDPOINT: &str = "/api/2.0/sql/statements";

/// Request shape for creating a SQL warehouse.
///
/// Field defaults mirror the upstream API: a single-cluster PRO warehouse
/// with Photon and cost-optimized spot instances, stopping after two hours
/// of inactivity.
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseSpec {
    pub name: String,
    pub cluster_size: String,
    pub min_num_clusters: u32,
    pub max_num_clusters: u32,
    pub auto_stop_mins: u32,
    pub enable_photon: bool,
    pub spot_instance_policy: String,
    pub warehouse_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl WarehouseSpec {
    pub fn new(name: impl Into<String>, cluster_size: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cluster_size: cluster_size.into(),
            min_num_clusters: 1,
            max_num_clusters: 1,
            auto_stop_mins: 120,
            enable_photon: true,
            spot_instance_policy: "COST_OPTIMIZED".to_string(),
            warehouse_type: "PRO".to_string(),
            channel: None,
            tags: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Stable view of a warehouse as returned by list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cluster_size: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_clusters: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_stop_mins: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WarehouseList {
    #[serde(default)]
    pub warehouses: Vec<WarehouseInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseCreated {
    pub id: String,
}

/// Statement execution response. `status` and `result` keep the raw
/// upstream shape since result manifests vary with the statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementResponse {
    pub statement_id: String,
    #[serde(default)]
    pub status: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Value>,
}

/// Typed access to the SQL endpoint family.
#[derive(Clone)]
pub struct SqlClient {
    api: Arc<ApiClient>,
}

impl SqlClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list_warehouses(&self) -> Result<WarehouseList, ApiError> {
        decode(self.api.get(WAREHOUSES_ENDPOINT, &[]).await?)
    }

    pub async fn create_warehouse(&self, spec: &WarehouseSpec) -> Result<WarehouseCreated, ApiError> {
        info!(name = %spec.name, "creating SQL warehouse");
        let body = serde_json::to_value(spec)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let created: WarehouseCreated = decode(self.api.post(WAREHOUSES_ENDPOINT, &body).await?)?;
        info!(warehouse_id = %created.id, "SQL warehouse created");
        Ok(created)
    }

    pub async fn execute_statement(
        &self,
        warehouse_id: &str,
        statement: &str,
        catalog: Option<&str>,
        schema: Option<&str>,
        wait_timeout: Option<u64>,
    ) -> Result<StatementResponse, ApiError> {
        info!(warehouse_id, "executing SQL statement");

        let mut body = serde_json::Map::new();
        body.insert("warehouse_id".to_string(), warehouse_id.into());
        body.insert("statement".to_string(), statement.into());
        body.insert("disposition".to_string(), "INLINE".into());
        if let Some(catalog) = catalog {
            body.insert("catalog".to_string(), catalog.into());
        }
        if let Some(schema) = schema {
            body.insert("schema".to_string(), schema.into());
        }
        if let Some(timeout) = wait_timeout {
            body.insert("wait_timeout".to_string(), format!("{timeout}s").into());
        }

        decode(self.api.post(STATEMENTS_ENDPOINT, &Value::Object(body)).await?)
    }
}
