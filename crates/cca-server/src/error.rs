//! Error types for the tool-protocol adapter.
use cca_core::ScheduleError;
use serde_json::{json, Value};
use thiserror::Error;

/// Message attached to every failed tool call.
pub const FAILURE_MESSAGE: &str = "Failed to generate supply schedule";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")] UnknownTool(String),
    #[error("invalid arguments: {0}")] InvalidArguments(String),
    #[error(transparent)] Schedule(#[from] ScheduleError),
    #[error("serialization: {0}")] Serialization(String),
}

impl ToolError {
    /// Unknown tools are reported as protocol errors; everything else is a
    /// failed tool result the caller can read.
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::UnknownTool(_))
    }

    /// Payload returned to the caller in place of a schedule.
    pub fn failure_payload(&self) -> Value {
        json!({
            "error": self.to_string(),
            "message": FAILURE_MESSAGE,
        })
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("io: {0}")] Io(#[from] std::io::Error),
    #[error("rpc server: {0}")] Rpc(String),
}
