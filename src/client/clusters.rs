//! Cluster lifecycle operations against `/api/2.1/clusters/*`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{decode, ApiClient, ApiError};

const CREATE_ENDPOINT: &str = "/api/2.1/clusters/create";
const LIST_ENDPOINT: &str = "/api/2.1/clusters/list";
const DELETE_ENDPOINT: &str = "/api/2.1/clusters/delete";
const START_ENDPOINT: &str = "/api/2.1/clusters/start";
const GET_ENDPOINT: &str = "/api/2.1/clusters/get";
const NODE_TYPES_ENDPOINT: &str = "/api/2.1/clusters/list-node-types";
const SPARK_VERSIONS_ENDPOINT: &str = "/api/2.1/clusters/spark-versions";

/// Autoscaling bounds for a cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AutoScale {
    pub min_workers: u32,
    pub max_workers: u32,
}

/// Request shape for creating a cluster.
///
/// Either `autoscale` or `num_workers` may be set, never both; the extra
/// map carries any additional fields the upstream API accepts that this
/// client does not model.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClusterSpec {
    pub cluster_name: String,
    pub spark_version: String,
    pub node_type_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscale: Option<AutoScale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_conf: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_tags: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_scripts: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Stable view of a cluster as returned by list/get.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub cluster_id: String,
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub spark_version: String,
    #[serde(default)]
    pub node_type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscale: Option<AutoScale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_user_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClusterList {
    #[serde(default)]
    pub clusters: Vec<ClusterInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterCreated {
    pub cluster_id: String,
}

/// Node type entry, pruned to the fields callers act on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeType {
    pub node_type_id: String,
    #[serde(default)]
    pub memory_mb: u64,
    #[serde(default)]
    pub num_cores: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub num_gpus: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NodeTypeList {
    #[serde(default)]
    pub node_types: Vec<NodeType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkVersion {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SparkVersionList {
    #[serde(default)]
    pub versions: Vec<SparkVersion>,
}

/// Typed access to the clusters endpoint family.
#[derive(Clone)]
pub struct ClustersClient {
    api: Arc<ApiClient>,
}

impl ClustersClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<ClusterList, ApiError> {
        decode(self.api.get(LIST_ENDPOINT, &[]).await?)
    }

    pub async fn create(&self, spec: &ClusterSpec) -> Result<ClusterCreated, ApiError> {
        if spec.autoscale.is_some() && spec.num_workers.is_some() {
            return Err(ApiError::InvalidRequest(
                "cannot specify both autoscale and num_workers".to_string(),
            ));
        }

        info!(cluster_name = %spec.cluster_name, "creating cluster");
        let body = serde_json::to_value(spec)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let created: ClusterCreated = decode(self.api.post(CREATE_ENDPOINT, &body).await?)?;
        info!(cluster_id = %created.cluster_id, "cluster created");
        Ok(created)
    }

    pub async fn delete(&self, cluster_id: &str) -> Result<Value, ApiError> {
        info!(cluster_id, "deleting cluster");
        self.api
            .post(DELETE_ENDPOINT, &serde_json::json!({ "cluster_id": cluster_id }))
            .await
    }

    pub async fn start(&self, cluster_id: &str) -> Result<Value, ApiError> {
        info!(cluster_id, "starting cluster");
        self.api
            .post(START_ENDPOINT, &serde_json::json!({ "cluster_id": cluster_id }))
            .await
    }

    pub async fn get(&self, cluster_id: &str) -> Result<ClusterInfo, ApiError> {
        decode(
            self.api
                .get(GET_ENDPOINT, &[("cluster_id", cluster_id)])
                .await?,
        )
    }

    pub async fn list_node_types(&self) -> Result<NodeTypeList, ApiError> {
        decode(self.api.get(NODE_TYPES_ENDPOINT, &[]).await?)
    }

    pub async fn list_spark_versions(&self) -> Result<SparkVersionList, ApiError> {
        decode(self.api.get(SPARK_VERSIONS_ENDPOINT, &[]).await?)
    }
}
