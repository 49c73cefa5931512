//! CCA supply schedule server binary.
//!
//! Serves the `generate_supply_schedule` tool over MCP on stdio (default) or
//! as JSON-RPC over HTTP. Logs always go to stderr since stdout carries the
//! MCP stream.

use anyhow::{Context, Result};
use cca_core::ScheduleParams;
use cca_server_lib::config::DEFAULT_RPC_PORT;
use cca_server_lib::{start_rpc_server, McpServer, ServerConfig, ToolRouter, Transport};
use clap::Parser;
use tracing::info;

/// CCA supply schedule server.
#[derive(Parser, Debug)]
#[command(
    name = "cca-supply-schedule",
    version,
    about = "Supply schedule generator for continuous clearing auctions"
)]
struct Args {
    /// Transport to serve on ("stdio" for MCP, "rpc" for HTTP JSON-RPC)
    #[arg(long, env = "CCA_TRANSPORT", default_value = "stdio")]
    transport: Transport,

    /// RPC server bind address
    #[arg(long, env = "CCA_RPC_BIND", default_value = "127.0.0.1")]
    rpc_bind: String,

    /// RPC server port
    #[arg(long, env = "CCA_RPC_PORT", default_value_t = DEFAULT_RPC_PORT)]
    rpc_port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CCA_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, env = "CCA_LOG_FORMAT", default_value = "text")]
    log_format: String,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            transport: self.transport,
            rpc_bind: self.rpc_bind,
            rpc_port: self.rpc_port,
            log_level: self.log_level,
            log_format: self.log_format,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config();
    init_logging(&config.log_level, config.json_logs());

    let params = ScheduleParams::default();
    info!("CCA Supply Schedule Server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        transport = %config.transport,
        total_target = params.total_target,
        num_segments = params.num_segments,
        growth_exponent = params.growth_exponent,
        "starting"
    );

    let router = ToolRouter::new(params);

    match config.transport {
        Transport::Stdio => {
            let server = McpServer::new(router);
            tokio::select! {
                res = server.serve_stdio() => res.context("MCP session failed")?,
                _ = tokio::signal::ctrl_c() => info!("received Ctrl+C, shutting down..."),
            }
        }
        Transport::Rpc => {
            let (addr, handle) = start_rpc_server(&config.rpc_addr(), router)
                .await
                .context("failed to start RPC server")?;
            info!("RPC server listening on {addr}");

            tokio::signal::ctrl_c()
                .await
                .context("failed to install Ctrl+C handler")?;
            info!("received Ctrl+C, shutting down...");

            handle.stop().ok();
            handle.stopped().await;
            info!("RPC server stopped");
        }
    }

    info!("shutdown complete");
    Ok(())
}

/// Initialize tracing on stderr with the given level and output format.
///
/// `RUST_LOG` takes precedence over `level_str` when set.
fn init_logging(level_str: &str, json: bool) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
