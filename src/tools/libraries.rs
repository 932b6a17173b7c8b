//! Tool for installing libraries on a cluster.

use serde_json::Value;

use crate::client::libraries::{LibrariesClient, Library};
use crate::tools::args::require_str;
use crate::tools::types::{ParamSpec, ParamType, Tool, ToolDescriptor, ToolError};

pub struct InstallLibrariesTool {
    libraries: LibrariesClient,
}

impl InstallLibrariesTool {
    pub fn new(libraries: LibrariesClient) -> Self {
        Self { libraries }
    }
}

#[async_trait::async_trait]
impl Tool for InstallLibrariesTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "install_libraries",
            description: "Install libraries on a running cluster. Each entry names one source: \
                          pypi, maven, cran, jar, egg, whl or requirements",
            params: vec![
                ParamSpec::required(
                    "cluster_id",
                    ParamType::String,
                    "ID of the cluster to install libraries on",
                ),
                ParamSpec::required(
                    "libraries",
                    ParamType::Array,
                    "Library specifications, e.g. [{\"pypi\": {\"package\": \"pandas\"}}]",
                ),
            ],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let cluster_id = require_str(&args, "cluster_id")?;
        let specs: Vec<Library> = args
            .get("libraries")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| ToolError::InvalidParameters(format!("libraries: {e}")))?
            .unwrap_or_default();

        self.libraries.install(cluster_id, &specs).await?;
        Ok(serde_json::json!({
            "cluster_id": cluster_id,
            "installed": specs.len(),
        }))
    }
}
