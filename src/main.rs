//! Server entry point: load settings, build the tool catalog, serve.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use databricks_mcp::client::ApiClient;
use databricks_mcp::config::{Settings, Transport};
use databricks_mcp::server::McpServer;
use databricks_mcp::tools::ToolRegistry;

#[tokio::main]
async fn main() -> ExitCode {
    // Optional; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Logs go to stderr so stdout stays a clean JSON-RPC channel.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(settings.env_filter()))
        .with_writer(std::io::stderr)
        .init();

    info!(
        host = %settings.databricks_host,
        transport = %settings.transport,
        "starting databricks mcp server"
    );

    let api = Arc::new(ApiClient::new(
        &settings.databricks_host,
        &settings.databricks_token,
    ));

    let registry = match ToolRegistry::with_catalog(api) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            error!(error = %e, "failed to build tool catalog");
            return ExitCode::FAILURE;
        }
    };
    info!(tools = registry.len(), "tool catalog ready");

    let server = McpServer::new(registry);
    let served = match settings.transport {
        Transport::Stdio => server.serve_stdio().await,
        Transport::Tcp => {
            server
                .serve_tcp(&settings.server_host, settings.server_port)
                .await
        }
    };

    if let Err(e) = served {
        error!(error = %e, "server terminated with error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
