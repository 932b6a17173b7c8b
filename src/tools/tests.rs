//! Tool registry and dispatch tests.

use std::sync::Arc;

use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::tools::types::{ParamSpec, ParamType, Tool, ToolDescriptor, ToolError};
use crate::tools::{DuplicateToolError, InvocationResult, ToolRegistry};

fn registry_against(server: &MockServer) -> ToolRegistry {
    let api = Arc::new(ApiClient::new(&server.base_url(), "dapi-test-token"));
    ToolRegistry::with_catalog(api).expect("catalog must register cleanly")
}

fn unreachable_registry() -> ToolRegistry {
    let api = Arc::new(ApiClient::new("http://127.0.0.1:1", "dapi-test-token"));
    ToolRegistry::with_catalog(api).expect("catalog must register cleanly")
}

/// Fixed-payload tool used for registry-level tests.
struct StubTool {
    name: &'static str,
    payload: Value,
}

#[async_trait::async_trait]
impl Tool for StubTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name,
            description: "stub",
            params: vec![
                ParamSpec::required("id", ParamType::String, "identifier"),
                ParamSpec::optional("limit", ParamType::Integer, "limit"),
                ParamSpec::optional("verbose", ParamType::Boolean, "verbosity")
                    .with_default(Value::Bool(false)),
            ],
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let mut payload = self.payload.clone();
        if let (Value::Object(out), Value::Object(args)) = (&mut payload, args) {
            out.insert("args".to_string(), Value::Object(args));
        }
        Ok(payload)
    }
}

fn stub(name: &'static str) -> Box<StubTool> {
    Box::new(StubTool {
        name,
        payload: json!({ "ok": true }),
    })
}

#[test]
fn catalog_registers_all_tools() {
    let server = MockServer::start();
    let registry = registry_against(&server);
    let names: Vec<&str> = registry.list().iter().map(|d| d.name).collect();

    assert_eq!(registry.len(), 18);
    for expected in [
        "list_clusters",
        "create_cluster",
        "delete_cluster",
        "start_cluster",
        "get_cluster",
        "list_node_types",
        "list_spark_versions",
        "install_libraries",
        "create_execution_context",
        "execute_command",
        "get_command_status",
        "list_sql_warehouses",
        "create_sql_warehouse",
        "execute_sql_statement",
        "delete_workspace_object",
        "get_workspace_object_status",
        "import_workspace_object",
        "create_workspace_directory",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = ToolRegistry::new();
    registry.register(stub("sample")).unwrap();

    let err = registry
        .register(stub("sample"))
        .expect_err("second registration must fail");
    assert!(matches!(err, DuplicateToolError(name) if name == "sample"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn descriptors_render_json_schema() {
    let schema = stub("sample").descriptor().input_schema();
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["id"]["type"], "string");
    assert_eq!(schema["properties"]["limit"]["type"], "integer");
    assert_eq!(schema["properties"]["verbose"]["default"], json!(false));
    assert_eq!(schema["required"], json!(["id"]));
}

#[tokio::test]
async fn dispatching_unknown_tool_reports_unknown_kind() {
    let registry = ToolRegistry::new();
    let result = registry.dispatch("no_such_tool", json!({})).await;
    assert!(
        matches!(result, InvocationResult::UnknownTool { ref message } if message.contains("no_such_tool"))
    );
}

#[tokio::test]
async fn missing_required_parameter_names_the_field() {
    let mut registry = ToolRegistry::new();
    registry.register(stub("sample")).unwrap();

    let result = registry.dispatch("sample", json!({})).await;
    match result {
        InvocationResult::InvalidParameters { message } => {
            assert!(message.contains("id"), "message should name the field: {message}");
        }
        other => panic!("expected InvalidParameters, got {other:?}"),
    }
}

#[tokio::test]
async fn declared_coercions_apply_and_defaults_fill_in() {
    let mut registry = ToolRegistry::new();
    registry.register(stub("sample")).unwrap();

    let result = registry
        .dispatch("sample", json!({ "id": "x", "limit": "25" }))
        .await;
    match result {
        InvocationResult::Success { payload } => {
            assert_eq!(payload["args"]["limit"], json!(25));
            assert_eq!(payload["args"]["verbose"], json!(false));
        }
        other => panic!("expected Success, got {other:?}"),
    }
}

#[tokio::test]
async fn non_numeric_string_fails_integer_coercion() {
    let mut registry = ToolRegistry::new();
    registry.register(stub("sample")).unwrap();

    let result = registry
        .dispatch("sample", json!({ "id": "x", "limit": "many" }))
        .await;
    match result {
        InvocationResult::InvalidParameters { message } => {
            assert!(message.contains("limit"));
            assert!(message.contains("integer"));
        }
        other => panic!("expected InvalidParameters, got {other:?}"),
    }
}

#[tokio::test]
async fn wrong_type_names_field_and_expected_type() {
    let mut registry = ToolRegistry::new();
    registry.register(stub("sample")).unwrap();

    let result = registry.dispatch("sample", json!({ "id": 7 })).await;
    match result {
        InvocationResult::InvalidParameters { message } => {
            assert!(message.contains("id"));
            assert!(message.contains("string"));
        }
        other => panic!("expected InvalidParameters, got {other:?}"),
    }
}

#[tokio::test]
async fn stubbed_payload_passes_through_unchanged() {
    let mut registry = ToolRegistry::new();
    registry
        .register(Box::new(StubTool {
            name: "fixed",
            payload: json!({ "rows": [1, 2, 3], "done": true }),
        }))
        .unwrap();

    let result = registry.dispatch("fixed", json!({ "id": "x" })).await;
    match result {
        InvocationResult::Success { payload } => {
            assert_eq!(payload["rows"], json!([1, 2, 3]));
            assert_eq!(payload["done"], json!(true));
        }
        other => panic!("expected Success, got {other:?}"),
    }
}

#[tokio::test]
async fn upstream_404_surfaces_status_and_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/2.1/clusters/get");
        then.status(404)
            .json_body(json!({ "message": "cluster not found" }));
    });

    let registry = registry_against(&server);
    let result = registry
        .dispatch("get_cluster", json!({ "cluster_id": "missing" }))
        .await;

    assert_eq!(
        result,
        InvocationResult::UpstreamError {
            status: 404,
            message: "cluster not found".to_string(),
        }
    );
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    let registry = unreachable_registry();
    let result = registry.dispatch("list_clusters", json!({})).await;
    assert!(matches!(result, InvocationResult::TransportError { .. }));
}

#[tokio::test]
async fn create_cluster_accepts_autoscale_arguments() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/api/2.1/clusters/create")
            .json_body_partial(
                json!({
                    "cluster_name": "etl",
                    "autoscale": { "min_workers": 2, "max_workers": 8 }
                })
                .to_string(),
            );
        then.status(200).json_body(json!({ "cluster_id": "c-auto" }));
    });

    let registry = registry_against(&server);
    let result = registry
        .dispatch(
            "create_cluster",
            json!({
                "cluster_name": "etl",
                "spark_version": "13.3.x-scala2.12",
                "node_type_id": "i3.xlarge",
                "autoscale": { "min_workers": 2, "max_workers": 8 }
            }),
        )
        .await;

    create.assert();
    match result {
        InvocationResult::Success { payload } => {
            assert_eq!(payload["cluster_id"], json!("c-auto"));
        }
        other => panic!("expected Success, got {other:?}"),
    }
}

#[tokio::test]
async fn warehouse_cluster_count_past_u32_is_rejected() {
    let server = MockServer::start();
    let registry = registry_against(&server);

    let result = registry
        .dispatch(
            "create_sql_warehouse",
            json!({
                "name": "analytics",
                "cluster_size": "2X-Small",
                "min_num_clusters": 4_294_967_297_u64
            }),
        )
        .await;

    match result {
        InvocationResult::InvalidParameters { message } => {
            assert!(message.contains("min_num_clusters"));
        }
        other => panic!("expected InvalidParameters, got {other:?}"),
    }
}

#[tokio::test]
async fn negative_auto_stop_is_rejected_not_defaulted() {
    let server = MockServer::start();
    let registry = registry_against(&server);

    let result = registry
        .dispatch(
            "create_sql_warehouse",
            json!({
                "name": "analytics",
                "cluster_size": "2X-Small",
                "auto_stop_mins": -30
            }),
        )
        .await;

    match result {
        InvocationResult::InvalidParameters { message } => {
            assert!(message.contains("auto_stop_mins"));
            assert!(message.contains("non-negative"));
        }
        other => panic!("expected InvalidParameters, got {other:?}"),
    }
}

#[tokio::test]
async fn negative_statement_wait_timeout_is_rejected() {
    let server = MockServer::start();
    let registry = registry_against(&server);

    let result = registry
        .dispatch(
            "execute_sql_statement",
            json!({
                "warehouse_id": "w-1",
                "statement": "SELECT 1",
                "wait_timeout": -5
            }),
        )
        .await;

    match result {
        InvocationResult::InvalidParameters { message } => {
            assert!(message.contains("wait_timeout"));
        }
        other => panic!("expected InvalidParameters, got {other:?}"),
    }
}

#[tokio::test]
async fn create_cluster_with_both_scaling_modes_is_invalid() {
    let server = MockServer::start();
    let registry = registry_against(&server);

    let result = registry
        .dispatch(
            "create_cluster",
            json!({
                "cluster_name": "etl",
                "spark_version": "13.3.x-scala2.12",
                "node_type_id": "i3.xlarge",
                "autoscale": { "min_workers": 1, "max_workers": 2 },
                "num_workers": 4
            }),
        )
        .await;

    assert!(matches!(result, InvocationResult::InvalidParameters { .. }));
}

#[tokio::test]
async fn execute_command_rejects_unsupported_language() {
    let server = MockServer::start();
    let registry = registry_against(&server);

    let result = registry
        .dispatch(
            "execute_command",
            json!({
                "cluster_id": "c-1",
                "context_id": "ctx-1",
                "language": "r",
                "command": "1 + 1"
            }),
        )
        .await;

    match result {
        InvocationResult::InvalidParameters { message } => {
            assert!(message.contains("language"));
        }
        other => panic!("expected InvalidParameters, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_dispatches_do_not_interfere() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/2.1/clusters/list");
        then.status(200)
            .json_body(json!({ "clusters": [{ "cluster_id": "c-1" }] }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/2.1/clusters/create");
        then.status(200).json_body(json!({ "cluster_id": "c-new" }));
    });

    let registry = Arc::new(registry_against(&server));

    let list = {
        let registry = registry.clone();
        tokio::spawn(async move { registry.dispatch("list_clusters", json!({})).await })
    };
    let create = {
        let registry = registry.clone();
        tokio::spawn(async move {
            registry
                .dispatch(
                    "create_cluster",
                    json!({
                        "cluster_name": "etl",
                        "spark_version": "13.3.x-scala2.12",
                        "node_type_id": "i3.xlarge",
                        "num_workers": 2
                    }),
                )
                .await
        })
    };

    let list = list.await.expect("list task");
    let create = create.await.expect("create task");

    match list {
        InvocationResult::Success { payload } => {
            assert_eq!(payload["clusters"][0]["cluster_id"], json!("c-1"));
        }
        other => panic!("expected Success from list, got {other:?}"),
    }
    match create {
        InvocationResult::Success { payload } => {
            assert_eq!(payload["cluster_id"], json!("c-new"));
        }
        other => panic!("expected Success from create, got {other:?}"),
    }
}

#[test]
fn invocation_result_serializes_with_kind_tag() {
    let success = InvocationResult::Success {
        payload: json!({ "x": 1 }),
    };
    let rendered = serde_json::to_value(&success).unwrap();
    assert_eq!(rendered["kind"], "success");
    assert_eq!(rendered["payload"]["x"], 1);

    let upstream = InvocationResult::UpstreamError {
        status: 404,
        message: "cluster not found".to_string(),
    };
    let rendered = serde_json::to_value(&upstream).unwrap();
    assert_eq!(rendered["kind"], "upstream_error");
    assert_eq!(rendered["status"], 404);
}
