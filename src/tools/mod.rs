//! Tool registry and implementations for Databricks workspace operations.
//!
//! This module provides:
//! - A registry mapping tool names to handlers, built once at startup
//! - Parameter schemas with explicit per-field coercion rules
//! - Built-in tools over clusters, libraries, command execution, SQL and
//!   workspace objects
//!
//! # Tool lifecycle
//!
//! 1. The server receives a `tools/call` request
//! 2. The registry validates arguments against the tool's schema
//! 3. The handler calls the bound resource client
//! 4. The outcome is folded into an `InvocationResult` envelope
//!
//! # Module structure
//!
//! - `types`: core types (Tool trait, descriptors, `InvocationResult`)
//! - `registry`: `ToolRegistry` for registration and dispatch
//! - `args`: accessors for validated argument objects
//! - `clusters`, `libraries`, `commands`, `sql`, `workspace`: tool
//!   implementations per endpoint family

pub use registry::{DuplicateToolError, ToolRegistry};
pub use types::{InvocationResult, ParamSpec, ParamType, Tool, ToolDescriptor, ToolError};

mod args;
pub mod clusters;
pub mod commands;
pub mod libraries;
mod registry;
pub mod sql;
mod types;
pub mod workspace;

#[cfg(test)]
mod tests;
