//! Server configuration for the supply schedule service.
//!
//! Provides [`ServerConfig`] with defaults for transport, RPC binding, and
//! logging. Schedule constants are not part of it: they are fixed by
//! [`cca_core::constants`].

use std::fmt;
use std::str::FromStr;

/// Default port for the JSON-RPC transport.
pub const DEFAULT_RPC_PORT: u16 = 18_532;

/// How the server talks to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transport {
    /// MCP over newline-delimited JSON-RPC on stdin/stdout.
    #[default]
    Stdio,
    /// JSON-RPC over HTTP.
    Rpc,
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" | "mcp" => Ok(Self::Stdio),
            "rpc" | "http" => Ok(Self::Rpc),
            other => Err(format!("unknown transport '{other}' (expected stdio or rpc)")),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdio => f.write_str("stdio"),
            Self::Rpc => f.write_str("rpc"),
        }
    }
}

/// Configuration for a server instance.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub transport: Transport,
    /// IP address for the JSON-RPC server to bind to.
    pub rpc_bind: String,
    /// Port for the JSON-RPC server.
    pub rpc_port: u16,
    /// Log level filter string (e.g. "info", "debug", "cca_core=trace").
    pub log_level: String,
    /// Log output format, "text" or "json".
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            rpc_bind: "127.0.0.1".to_string(),
            rpc_port: DEFAULT_RPC_PORT,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl ServerConfig {
    /// Socket address string for the RPC server.
    pub fn rpc_addr(&self) -> String {
        format!("{}:{}", self.rpc_bind, self.rpc_port)
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}
