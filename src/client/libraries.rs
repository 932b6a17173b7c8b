//! Library installation against `/api/2.0/libraries/install`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{ApiClient, ApiError};

const INSTALL_ENDPOINT: &str = "/api/2.0/libraries/install";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PyPiLibrary {
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MavenLibrary {
    pub coordinates: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CranLibrary {
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

/// One library to install; exactly one variant field should be set,
/// matching the upstream request shape.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Library {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pypi: Option<PyPiLibrary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maven: Option<MavenLibrary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cran: Option<CranLibrary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

impl Library {
    fn is_empty(&self) -> bool {
        self.pypi.is_none()
            && self.maven.is_none()
            && self.cran.is_none()
            && self.jar.is_none()
            && self.egg.is_none()
            && self.whl.is_none()
            && self.requirements.is_none()
    }
}

/// Typed access to the libraries endpoint family.
#[derive(Clone)]
pub struct LibrariesClient {
    api: Arc<ApiClient>,
}

impl LibrariesClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn install(
        &self,
        cluster_id: &str,
        libraries: &[Library],
    ) -> Result<Value, ApiError> {
        if libraries.is_empty() {
            return Err(ApiError::InvalidRequest(
                "libraries must not be empty".to_string(),
            ));
        }
        if let Some(idx) = libraries.iter().position(Library::is_empty) {
            return Err(ApiError::InvalidRequest(format!(
                "library at index {idx} does not name a package source"
            )));
        }

        info!(cluster_id, count = libraries.len(), "installing libraries");
        self.api
            .post(
                INSTALL_ENDPOINT,
                &serde_json::json!({
                    "cluster_id": cluster_id,
                    "libraries": libraries,
                }),
            )
            .await
    }
}
