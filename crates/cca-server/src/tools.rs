//! Tool registry and dispatch.
//!
//! The server exposes a single tool, `generate_supply_schedule`. Handlers are
//! thin wrappers over [`cca_core::generate_schedule`]; everything the caller
//! sees besides the phases is summary data derived from the schedule.

use cca_core::constants::FINAL_SHARE_BAND_PCT;
use cca_core::{generate_schedule, Schedule, ScheduleParams, ScheduleRequest, ScheduleSummary};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::ToolError;

/// Name of the schedule generation tool.
pub const GENERATE_SUPPLY_SCHEDULE: &str = "generate_supply_schedule";

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Arguments accepted by `generate_supply_schedule`.
///
/// Block counts may arrive as integers, integral floats (`86400.0`) or
/// decimal strings (`"86400"`). Fractions, negatives and `null` are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GenerateScheduleInput {
    #[serde(deserialize_with = "block_count")]
    pub auction_blocks: u64,
    #[serde(default, deserialize_with = "block_count")]
    pub prebid_blocks: u64,
}

fn block_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_block_count(&value).ok_or_else(|| {
        D::Error::custom(format!("expected a non-negative whole number of blocks, got {value}"))
    })
}

fn coerce_block_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral_u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn integral_u64(f: f64) -> Option<u64> {
    // 2^64 itself is representable as f64 but not as u64.
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64).then_some(f as u64)
}

impl From<GenerateScheduleInput> for ScheduleRequest {
    fn from(input: GenerateScheduleInput) -> Self {
        ScheduleRequest::new(input.auction_blocks, input.prebid_blocks)
    }
}

/// Tool output: the schedule plus request echo and summary totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub schedule: Schedule,
    pub auction_blocks: u64,
    pub prebid_blocks: u64,
    pub total_phases: usize,
    pub summary: ScheduleSummary,
}

impl ScheduleReport {
    pub fn new(request: &ScheduleRequest, schedule: Schedule, params: &ScheduleParams) -> Self {
        let summary = schedule.summary(params);
        Self {
            auction_blocks: request.auction_blocks,
            prebid_blocks: request.prebid_blocks,
            total_phases: schedule.len(),
            summary,
            schedule,
        }
    }
}

/// Dispatches tool calls to the schedule generator.
///
/// Holds no mutable state, so clones can serve concurrent calls freely.
#[derive(Debug, Clone, Default)]
pub struct ToolRouter {
    params: ScheduleParams,
}

impl ToolRouter {
    pub fn new(params: ScheduleParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ScheduleParams {
        &self.params
    }

    /// Lists the tools supported by this server.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: GENERATE_SUPPLY_SCHEDULE.to_string(),
            description: self.schedule_tool_description(),
            input_schema: generate_schedule_input_schema(),
        }]
    }

    /// Handles a tool call by name with its JSON arguments.
    pub fn handle_tool_call(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        if name != GENERATE_SUPPLY_SCHEDULE {
            return Err(ToolError::UnknownTool(name.to_string()));
        }
        let input: GenerateScheduleInput = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        let report = self.generate(input.into())?;
        serde_json::to_value(report).map_err(|e| ToolError::Serialization(e.to_string()))
    }

    /// Generate a schedule and its report.
    pub fn generate(&self, request: ScheduleRequest) -> Result<ScheduleReport, ToolError> {
        let schedule = generate_schedule(&request, &self.params)?;
        let report = ScheduleReport::new(&request, schedule, &self.params);

        let pct = report.summary.final_block_percentage;
        let (lo, hi) = FINAL_SHARE_BAND_PCT;
        if !(lo..=hi).contains(&pct) {
            warn!(
                auction_blocks = request.auction_blocks,
                final_block_percentage = pct,
                "final block share outside the expected {lo}-{hi}% band"
            );
        }
        info!(
            auction_blocks = request.auction_blocks,
            prebid_blocks = request.prebid_blocks,
            phases = report.total_phases,
            final_block_percentage = pct,
            "generated supply schedule"
        );
        Ok(report)
    }

    fn schedule_tool_description(&self) -> String {
        let p = &self.params;
        format!(
            "Generate a CCA (Continuous Clearing Auction) supply schedule with exponential distribution. \
             The schedule uses {n} segments with block durations growing by {g}x each segment. \
             Token distribution follows a cumulative exponential curve (t/T)^{g} scaled to {front:.0}% of supply, \
             with the final block receiving the remaining ~{rest:.0}%. \
             Returns an array of {{mps, blockDelta}} objects. \
             MPS = milli-basis points ({target} total), representing tokens per block.",
            n = p.num_segments,
            g = p.growth_exponent,
            front = p.front_share * 100.0,
            rest = (1.0 - p.front_share) * 100.0,
            target = p.total_target,
        )
    }
}

fn generate_schedule_input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "auction_blocks": {
                "type": "integer",
                "description": "Total number of blocks for the auction, prebid period included (e.g., 86400 for 2 days on Base with 2s blocks)",
                "minimum": 1
            },
            "prebid_blocks": {
                "type": "integer",
                "description": "Number of blocks for prebid period with 0 mps (default: 0)",
                "minimum": 0,
                "default": 0
            }
        },
        "required": ["auction_blocks"]
    })
}
