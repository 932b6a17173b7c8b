//! MCP server for Databricks workspaces.
//!
//! Exposes Databricks REST operations (clusters, libraries, command
//! execution, SQL warehouses and workspace objects) as Model Context
//! Protocol tools over stdio or TCP.
//!
//! The crate is layered bottom-up:
//!
//! - [`config`]: environment-driven settings, validated at startup
//! - [`client`]: thin typed clients over the Databricks REST API
//! - [`tools`]: the tool catalog, parameter validation and dispatch
//! - [`server`]: JSON-RPC 2.0 message handling and transports

pub mod client;
pub mod config;
pub mod server;
pub mod tools;
