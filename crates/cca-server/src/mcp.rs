//! MCP server over newline-delimited JSON-RPC 2.0.
//!
//! One request per line in, one response per line out. Notifications (no
//! `id`) never get a reply. A malformed line produces an error response and
//! the loop keeps going; only I/O failures or end of input stop it.
//!
//! Supported methods: `initialize`, `ping`, `tools/list`, `tools/call`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::error::{ServerError, ToolError};
use crate::tools::ToolRouter;

/// MCP protocol revision implemented by this server.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "cca-supply-schedule";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct Response {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ErrorBody {
    code: i32,
    message: String,
}

impl ErrorBody {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// MCP front end for a [`ToolRouter`].
#[derive(Debug, Clone, Default)]
pub struct McpServer {
    router: ToolRouter,
}

impl McpServer {
    pub fn new(router: ToolRouter) -> Self {
        Self { router }
    }

    /// Serve MCP on the process's stdin and stdout until stdin closes.
    pub async fn serve_stdio(&self) -> Result<(), ServerError> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve MCP on arbitrary streams until `reader` reaches end of input.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(protocol = PROTOCOL_VERSION, "MCP session started");
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(reply) = self.handle_line(&line) {
                writer.write_all(reply.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        info!("MCP session ended");
        Ok(())
    }

    /// Process one JSON-RPC message and return the serialized reply, if any.
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => {
                warn!(error = %e, "unparseable message");
                error_response(Value::Null, ErrorBody::new(PARSE_ERROR, format!("Parse error: {e}")))
            }
            Ok(raw) => {
                let id_hint = raw.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<Request>(raw) {
                    Err(e) => error_response(
                        id_hint,
                        ErrorBody::new(INVALID_REQUEST, format!("Invalid request: {e}")),
                    ),
                    Ok(request) => self.handle_request(request)?,
                }
            }
        };

        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                None
            }
        }
    }

    fn handle_request(&self, request: Request) -> Option<Response> {
        let Some(id) = request.id else {
            debug!(method = %request.method, "notification");
            return None;
        };
        debug!(method = %request.method, %id, "request");

        let response = match self.dispatch(&request.method, request.params) {
            Ok(result) => Response {
                jsonrpc: "2.0",
                id,
                result: Some(result),
                error: None,
            },
            Err(body) => error_response(id, body),
        };
        Some(response)
    }

    fn dispatch(&self, method: &str, params: Value) -> Result<Value, ErrorBody> {
        match method {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.router.list_tools() })),
            "tools/call" => self.call_tool(params),
            other => Err(ErrorBody::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        }
    }

    fn call_tool(&self, params: Value) -> Result<Value, ErrorBody> {
        let call: CallParams = serde_json::from_value(params)
            .map_err(|e| ErrorBody::new(INVALID_PARAMS, format!("Invalid params: {e}")))?;

        match self.router.handle_tool_call(&call.name, call.arguments) {
            Ok(output) => {
                let text = serde_json::to_string_pretty(&output)
                    .map_err(|e| ErrorBody::new(INTERNAL_ERROR, e.to_string()))?;
                Ok(tool_result(text, false))
            }
            Err(err @ ToolError::UnknownTool(_)) => {
                Err(ErrorBody::new(INVALID_PARAMS, err.to_string()))
            }
            Err(err) => {
                error!(tool = %call.name, error = %err, "error generating supply schedule");
                Ok(tool_result(err.failure_payload().to_string(), true))
            }
        }
    }
}

fn tool_result(text: String, is_error: bool) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error,
    })
}

fn error_response(id: Value, body: ErrorBody) -> Response {
    Response {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(body),
    }
}
