//! Prompt templates exposed over `prompts/list` and `prompts/get`.

use serde::Deserialize;
use serde_json::Value;

use super::{JsonRpcResponse, INVALID_PARAMS};

const CLUSTER_CONFIG_PROMPT: &str = "create-databricks-cluster-configurations";

pub fn handle_list(id: Option<Value>) -> JsonRpcResponse {
    JsonRpcResponse::success(
        id,
        serde_json::json!({
            "prompts": [{
                "name": CLUSTER_CONFIG_PROMPT,
                "description": "Generate configuration for creating a Databricks cluster",
                "arguments": [
                    { "name": "cluster_name", "description": "Name of the cluster", "required": true },
                    { "name": "node_type_id", "description": "Type of nodes", "required": true },
                    { "name": "spark_version", "description": "Spark version to use", "required": true },
                    { "name": "purpose", "description": "Purpose of the cluster", "required": false },
                    { "name": "autoscaling", "description": "Whether to enable autoscaling (yes/no)", "required": false },
                    { "name": "min_workers", "description": "Minimum workers when autoscaling", "required": false },
                    { "name": "max_workers", "description": "Maximum workers when autoscaling", "required": false },
                    { "name": "fixed_workers", "description": "Fixed worker count without autoscaling", "required": false }
                ]
            }]
        }),
    )
}

pub fn handle_get(id: Option<Value>, params: Value) -> JsonRpcResponse {
    #[derive(Debug, Deserialize)]
    struct GetParams {
        name: String,
        #[serde(default)]
        arguments: Value,
    }

    let params: GetParams = match serde_json::from_value(params) {
        Ok(p) => p,
        Err(e) => {
            return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {e}"));
        }
    };

    if params.name != CLUSTER_CONFIG_PROMPT {
        return JsonRpcResponse::error(
            id,
            INVALID_PARAMS,
            format!("Unknown prompt: {}", params.name),
        );
    }

    let text = match cluster_config_text(&params.arguments) {
        Ok(text) => text,
        Err(message) => return JsonRpcResponse::error(id, INVALID_PARAMS, message),
    };

    JsonRpcResponse::success(
        id,
        serde_json::json!({
            "messages": [{
                "role": "user",
                "content": { "type": "text", "text": text }
            }]
        }),
    )
}

fn cluster_config_text(arguments: &Value) -> Result<String, String> {
    let arg = |name: &str| -> Option<&str> { arguments.get(name).and_then(Value::as_str) };
    let required = |name: &str| -> Result<&str, String> {
        arg(name).ok_or_else(|| format!("Missing required argument: {name}"))
    };

    let cluster_name = required("cluster_name")?;
    let node_type_id = required("node_type_id")?;
    let spark_version = required("spark_version")?;
    let purpose = arg("purpose").unwrap_or("General Purpose");
    let autoscaling = arg("autoscaling").unwrap_or("yes");

    let mut text = format!(
        "I need help creating a Databricks cluster with the following requirements:\n\n\
         - Cluster name: {cluster_name}\n\
         - Node type: {node_type_id}\n\
         - Spark version: {spark_version}\n\
         - Purpose: {purpose}\n\
         - Autoscaling: {autoscaling}\n"
    );

    if autoscaling.eq_ignore_ascii_case("yes") {
        let min_workers = arg("min_workers").unwrap_or("2");
        let max_workers = arg("max_workers").unwrap_or("4");
        text.push_str(&format!("- Minimum workers: {min_workers}\n"));
        text.push_str(&format!("- Maximum workers: {max_workers}\n"));
    } else {
        let fixed_workers = arg("fixed_workers").unwrap_or("4");
        text.push_str(&format!("- Fixed number of workers: {fixed_workers}\n"));
    }

    text.push_str(
        "\nBased on these requirements, please provide:\n\
         1. An explanation of the configuration choices, especially for any recommended settings\n\
         2. Best practices for this type of cluster configuration\n",
    );

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn autoscaling_prompt_mentions_worker_bounds() {
        let text = cluster_config_text(&json!({
            "cluster_name": "etl",
            "node_type_id": "i3.xlarge",
            "spark_version": "13.3.x-scala2.12",
            "min_workers": "3",
            "max_workers": "9"
        }))
        .unwrap();

        assert!(text.contains("Minimum workers: 3"));
        assert!(text.contains("Maximum workers: 9"));
        assert!(!text.contains("Fixed number of workers"));
    }

    #[test]
    fn fixed_worker_prompt_skips_autoscale_bounds() {
        let text = cluster_config_text(&json!({
            "cluster_name": "etl",
            "node_type_id": "i3.xlarge",
            "spark_version": "13.3.x-scala2.12",
            "autoscaling": "no",
            "fixed_workers": "6"
        }))
        .unwrap();

        assert!(text.contains("Fixed number of workers: 6"));
        assert!(!text.contains("Minimum workers"));
    }

    #[test]
    fn missing_required_argument_is_reported() {
        let err = cluster_config_text(&json!({ "cluster_name": "etl" })).unwrap_err();
        assert!(err.contains("node_type_id"));
    }
}
