//! JSON-RPC message handling tests.

use std::sync::Arc;

use httpmock::Method::GET;
use httpmock::MockServer;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::server::{JsonRpcRequest, McpServer, METHOD_NOT_FOUND, PARSE_ERROR};
use crate::tools::ToolRegistry;

fn server_against(upstream: &MockServer) -> McpServer {
    let api = Arc::new(ApiClient::new(&upstream.base_url(), "dapi-test-token"));
    let registry = ToolRegistry::with_catalog(api).expect("catalog must register cleanly");
    McpServer::new(Arc::new(registry))
}

fn request(id: i64, method: &str, params: Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!(id)),
        method: method.to_string(),
        params,
    }
}

#[tokio::test]
async fn initialize_reports_protocol_and_server_info() {
    let upstream = MockServer::start();
    let server = server_against(&upstream);

    let response = server
        .handle_request(request(1, "initialize", json!({})))
        .await
        .expect("initialize gets a response");

    let result = response.result.expect("success result");
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "databricks-mcp");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn notifications_get_no_response() {
    let upstream = MockServer::start();
    let server = server_against(&upstream);

    let notification = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: None,
        method: "notifications/initialized".to_string(),
        params: json!({}),
    };

    assert!(server.handle_request(notification).await.is_none());
}

#[tokio::test]
async fn tools_list_exposes_catalog_with_schemas() {
    let upstream = MockServer::start();
    let server = server_against(&upstream);

    let response = server
        .handle_request(request(2, "tools/list", json!({})))
        .await
        .expect("tools/list gets a response");

    let result = response.result.expect("success result");
    let tools = result["tools"].as_array().expect("tools array");
    assert_eq!(tools.len(), 18);

    let get_cluster = tools
        .iter()
        .find(|t| t["name"] == "get_cluster")
        .expect("get_cluster is listed");
    assert_eq!(get_cluster["inputSchema"]["type"], "object");
    assert_eq!(get_cluster["inputSchema"]["required"], json!(["cluster_id"]));
}

#[tokio::test]
async fn tools_call_wraps_success_payload_as_text_content() {
    let upstream = MockServer::start();
    upstream.mock(|when, then| {
        when.method(GET).path("/api/2.1/clusters/list");
        then.status(200).json_body(json!({
            "clusters": [{ "cluster_id": "c-1", "cluster_name": "etl" }]
        }));
    });
    let server = server_against(&upstream);

    let response = server
        .handle_request(request(
            3,
            "tools/call",
            json!({ "name": "list_clusters", "arguments": {} }),
        ))
        .await
        .expect("tools/call gets a response");

    let result = response.result.expect("success result");
    assert_eq!(result["isError"], json!(false));
    let text = result["content"][0]["text"].as_str().expect("text content");
    let payload: Value = serde_json::from_str(text).expect("payload is JSON");
    assert_eq!(payload["clusters"][0]["cluster_id"], "c-1");
    assert_eq!(payload["total_clusters"], 1);
}

#[tokio::test]
async fn tools_call_failure_is_a_well_formed_error_result() {
    let upstream = MockServer::start();
    upstream.mock(|when, then| {
        when.method(GET).path("/api/2.1/clusters/get");
        then.status(404)
            .json_body(json!({ "message": "cluster not found" }));
    });
    let server = server_against(&upstream);

    let response = server
        .handle_request(request(
            4,
            "tools/call",
            json!({ "name": "get_cluster", "arguments": { "cluster_id": "nope" } }),
        ))
        .await
        .expect("tools/call gets a response");

    // Tool failures are results, not JSON-RPC errors.
    assert!(response.error.is_none());
    let result = response.result.expect("result present");
    assert_eq!(result["isError"], json!(true));
    let text = result["content"][0]["text"].as_str().expect("text content");
    let envelope: Value = serde_json::from_str(text).expect("envelope is JSON");
    assert_eq!(envelope["kind"], "upstream_error");
    assert_eq!(envelope["status"], 404);
    assert_eq!(envelope["message"], "cluster not found");
}

#[tokio::test]
async fn tools_call_unknown_tool_is_flagged_in_result() {
    let upstream = MockServer::start();
    let server = server_against(&upstream);

    let response = server
        .handle_request(request(
            5,
            "tools/call",
            json!({ "name": "no_such_tool", "arguments": {} }),
        ))
        .await
        .expect("tools/call gets a response");

    let result = response.result.expect("result present");
    assert_eq!(result["isError"], json!(true));
    let text = result["content"][0]["text"].as_str().expect("text content");
    assert!(text.contains("unknown_tool"));
}

#[tokio::test]
async fn unknown_method_is_a_jsonrpc_error() {
    let upstream = MockServer::start();
    let server = server_against(&upstream);

    let response = server
        .handle_request(request(6, "resources/list", json!({})))
        .await
        .expect("unknown method gets a response");

    let error = response.error.expect("error present");
    assert_eq!(error.code, METHOD_NOT_FOUND);
}

#[tokio::test]
async fn prompts_round_trip() {
    let upstream = MockServer::start();
    let server = server_against(&upstream);

    let listed = server
        .handle_request(request(7, "prompts/list", json!({})))
        .await
        .expect("prompts/list gets a response");
    let prompts = listed.result.expect("result")["prompts"].clone();
    assert_eq!(
        prompts[0]["name"],
        "create-databricks-cluster-configurations"
    );

    let fetched = server
        .handle_request(request(
            8,
            "prompts/get",
            json!({
                "name": "create-databricks-cluster-configurations",
                "arguments": {
                    "cluster_name": "etl",
                    "node_type_id": "i3.xlarge",
                    "spark_version": "13.3.x-scala2.12"
                }
            }),
        ))
        .await
        .expect("prompts/get gets a response");

    let result = fetched.result.expect("result");
    let text = result["messages"][0]["content"]["text"]
        .as_str()
        .expect("text");
    assert!(text.contains("Cluster name: etl"));
}

#[tokio::test]
async fn ping_returns_empty_object() {
    let upstream = MockServer::start();
    let server = server_against(&upstream);

    let response = server
        .handle_request(request(9, "ping", json!({})))
        .await
        .expect("ping gets a response");
    assert_eq!(response.result, Some(json!({})));
}

#[test]
fn parse_error_code_matches_jsonrpc_spec() {
    assert_eq!(PARSE_ERROR, -32700);
}
