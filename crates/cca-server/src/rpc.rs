//! JSON-RPC server for schedule generation.
//!
//! Uses jsonrpsee 0.24 to expose the same generator the MCP tool wraps, for
//! callers that prefer plain HTTP JSON-RPC.

use std::net::SocketAddr;

use jsonrpsee::core::async_trait;
use jsonrpsee::proc_macros::rpc;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::ErrorObjectOwned;
use serde::{Deserialize, Serialize};

use cca_core::constants::FINAL_PHASE_BLOCKS;
use cca_core::ScheduleRequest;

use crate::error::{ServerError, ToolError};
use crate::tools::{ScheduleReport, ToolRouter};

/// JSON representation of the fixed schedule parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamsJson {
    /// Supply every schedule emits, in mps units.
    pub total_target: u64,
    /// Number of growing segments.
    pub num_segments: usize,
    /// Duration growth ratio and curve exponent.
    pub growth_exponent: f64,
    /// Share of the target spread across the segments.
    pub front_share: f64,
    /// Length of the remainder phase.
    pub final_phase_blocks: u64,
    /// Shortest auction accepted without a prebid period.
    pub min_auction_blocks: u64,
}

/// The supply schedule JSON-RPC interface.
#[rpc(server)]
pub trait SupplyRpc {
    /// Generates the supply schedule for an auction.
    #[method(name = "generatesupplyschedule")]
    async fn generate_supply_schedule(
        &self,
        auction_blocks: u64,
        prebid_blocks: Option<u64>,
    ) -> Result<ScheduleReport, ErrorObjectOwned>;

    /// Returns the fixed schedule parameters.
    #[method(name = "getscheduleparams")]
    async fn get_schedule_params(&self) -> Result<ParamsJson, ErrorObjectOwned>;
}

/// Implementation of the supply schedule JSON-RPC server.
pub struct RpcServerImpl {
    router: ToolRouter,
}

impl RpcServerImpl {
    pub fn new(router: ToolRouter) -> Self {
        Self { router }
    }
}

#[async_trait]
impl SupplyRpcServer for RpcServerImpl {
    async fn generate_supply_schedule(
        &self,
        auction_blocks: u64,
        prebid_blocks: Option<u64>,
    ) -> Result<ScheduleReport, ErrorObjectOwned> {
        let request = ScheduleRequest::new(auction_blocks, prebid_blocks.unwrap_or(0));
        self.router.generate(request).map_err(|e| {
            tracing::warn!(auction_blocks, error = %e, "schedule request failed");
            tool_rpc_error(&e)
        })
    }

    async fn get_schedule_params(&self) -> Result<ParamsJson, ErrorObjectOwned> {
        let p = self.router.params();
        Ok(ParamsJson {
            total_target: p.total_target,
            num_segments: p.num_segments,
            growth_exponent: p.growth_exponent,
            front_share: p.front_share,
            final_phase_blocks: FINAL_PHASE_BLOCKS,
            min_auction_blocks: ScheduleRequest::min_auction_blocks(p, 0),
        })
    }
}

/// Map a tool failure onto a JSON-RPC error.
///
/// Request problems use the invalid-params code; anything else is -1.
fn tool_rpc_error(err: &ToolError) -> ErrorObjectOwned {
    let code = match err {
        ToolError::InvalidArguments(_) => -32602,
        ToolError::Schedule(e) if e.is_invalid_request() => -32602,
        _ => -1,
    };
    rpc_error(code, &err.to_string())
}

/// Create a JSON-RPC error.
fn rpc_error(code: i32, msg: &str) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(code, msg.to_string(), None::<()>)
}

/// Start the JSON-RPC server on the given address.
///
/// Returns the bound address (useful with port 0) and a [`ServerHandle`]
/// that can be used to stop the server.
pub async fn start_rpc_server(
    addr: &str,
    router: ToolRouter,
) -> Result<(SocketAddr, ServerHandle), ServerError> {
    let server = Server::builder()
        .build(addr)
        .await
        .map_err(|e| ServerError::Rpc(format!("failed to bind {addr}: {e}")))?;
    let local_addr = server.local_addr()?;

    let rpc_impl = RpcServerImpl::new(router);
    let handle = server.start(rpc_impl.into_rpc());

    Ok((local_addr, handle))
}
