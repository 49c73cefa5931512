//! # cca-server — Tool-protocol adapter for supply schedule generation.
//!
//! Wraps [`cca_core`] for long-lived callers:
//! - [`tools::ToolRouter`] — tool registry and dispatch, report building
//! - [`mcp::McpServer`] — MCP over newline-delimited JSON-RPC on stdio
//! - [`rpc`] — JSON-RPC server over HTTP
//! - [`config::ServerConfig`] — server configuration

pub mod config;
pub mod error;
pub mod mcp;
pub mod rpc;
pub mod tools;

pub use config::{ServerConfig, Transport};
pub use error::{ServerError, ToolError};
pub use mcp::McpServer;
pub use rpc::start_rpc_server;
pub use tools::{ScheduleReport, ToolRouter};
