//! Tools for cluster lifecycle and catalog lookups.

use serde_json::Value;

use crate::client::clusters::{ClusterSpec, ClustersClient};
use crate::tools::args::require_str;
use crate::tools::types::{ParamSpec, ParamType, Tool, ToolDescriptor, ToolError};

pub struct ListClustersTool {
    clusters: ClustersClient,
}

impl ListClustersTool {
    pub fn new(clusters: ClustersClient) -> Self {
        Self { clusters }
    }
}

#[async_trait::async_trait]
impl Tool for ListClustersTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "list_clusters",
            description: "List all Databricks clusters in the workspace",
            params: vec![],
        }
    }

    async fn invoke(&self, _args: Value) -> Result<Value, ToolError> {
        let list = self.clusters.list().await?;
        let total = list.clusters.len();
        let has_more = list.next_page_token.is_some();
        Ok(serde_json::json!({
            "clusters": list.clusters,
            "total_clusters": total,
            "has_more": has_more,
        }))
    }
}

pub struct CreateClusterTool {
    clusters: ClustersClient,
}

impl CreateClusterTool {
    pub fn new(clusters: ClustersClient) -> Self {
        Self { clusters }
    }
}

#[async_trait::async_trait]
impl Tool for CreateClusterTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "create_cluster",
            description: "Create a new Databricks cluster",
            params: vec![
                ParamSpec::required("cluster_name", ParamType::String, "Name of the cluster"),
                ParamSpec::required(
                    "spark_version",
                    ParamType::String,
                    "Spark version to use, e.g. '13.3.x-scala2.12'",
                ),
                ParamSpec::required(
                    "node_type_id",
                    ParamType::String,
                    "Node type, e.g. 'Standard_DS3_v2' (Azure) or 'i3.xlarge' (AWS)",
                ),
                ParamSpec::optional(
                    "autoscale",
                    ParamType::Object,
                    "Autoscaling bounds with min_workers and max_workers",
                ),
                ParamSpec::optional(
                    "num_workers",
                    ParamType::Integer,
                    "Fixed worker count; mutually exclusive with autoscale",
                ),
                ParamSpec::optional(
                    "spark_conf",
                    ParamType::Object,
                    "Spark configuration properties",
                ),
                ParamSpec::optional("custom_tags", ParamType::Object, "Custom resource tags"),
                ParamSpec::optional(
                    "init_scripts",
                    ParamType::Array,
                    "Initialization script configurations",
                ),
            ],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let spec: ClusterSpec = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
        let created = self.clusters.create(&spec).await?;
        Ok(serde_json::json!({ "cluster_id": created.cluster_id }))
    }
}

pub struct DeleteClusterTool {
    clusters: ClustersClient,
}

impl DeleteClusterTool {
    pub fn new(clusters: ClustersClient) -> Self {
        Self { clusters }
    }
}

#[async_trait::async_trait]
impl Tool for DeleteClusterTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "delete_cluster",
            description: "Terminate and delete a Databricks cluster",
            params: vec![ParamSpec::required(
                "cluster_id",
                ParamType::String,
                "ID of the cluster to delete",
            )],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let cluster_id = require_str(&args, "cluster_id")?;
        self.clusters.delete(cluster_id).await?;
        Ok(serde_json::json!({ "cluster_id": cluster_id, "deleted": true }))
    }
}

pub struct StartClusterTool {
    clusters: ClustersClient,
}

impl StartClusterTool {
    pub fn new(clusters: ClustersClient) -> Self {
        Self { clusters }
    }
}

#[async_trait::async_trait]
impl Tool for StartClusterTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "start_cluster",
            description: "Start a terminated Databricks cluster",
            params: vec![ParamSpec::required(
                "cluster_id",
                ParamType::String,
                "ID of the cluster to start",
            )],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let cluster_id = require_str(&args, "cluster_id")?;
        self.clusters.start(cluster_id).await?;
        Ok(serde_json::json!({ "cluster_id": cluster_id, "started": true }))
    }
}

pub struct GetClusterTool {
    clusters: ClustersClient,
}

impl GetClusterTool {
    pub fn new(clusters: ClustersClient) -> Self {
        Self { clusters }
    }
}

#[async_trait::async_trait]
impl Tool for GetClusterTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "get_cluster",
            description: "Get information about a specific Databricks cluster",
            params: vec![ParamSpec::required(
                "cluster_id",
                ParamType::String,
                "ID of the cluster to inspect",
            )],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let cluster_id = require_str(&args, "cluster_id")?;
        let info = self.clusters.get(cluster_id).await?;
        serde_json::to_value(info).map_err(|e| ToolError::InvalidParameters(e.to_string()))
    }
}

pub struct ListNodeTypesTool {
    clusters: ClustersClient,
}

impl ListNodeTypesTool {
    pub fn new(clusters: ClustersClient) -> Self {
        Self { clusters }
    }
}

#[async_trait::async_trait]
impl Tool for ListNodeTypesTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "list_node_types",
            description: "List available node types for Databricks clusters",
            params: vec![],
        }
    }

    async fn invoke(&self, _args: Value) -> Result<Value, ToolError> {
        let list = self.clusters.list_node_types().await?;
        Ok(serde_json::json!({ "node_types": list.node_types }))
    }
}

pub struct ListSparkVersionsTool {
    clusters: ClustersClient,
}

impl ListSparkVersionsTool {
    pub fn new(clusters: ClustersClient) -> Self {
        Self { clusters }
    }
}

#[async_trait::async_trait]
impl Tool for ListSparkVersionsTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "list_spark_versions",
            description: "List available Spark versions for Databricks clusters",
            params: vec![],
        }
    }

    async fn invoke(&self, _args: Value) -> Result<Value, ToolError> {
        let list = self.clusters.list_spark_versions().await?;
        Ok(serde_json::json!({ "versions": list.versions }))
    }
}
