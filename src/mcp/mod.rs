//! # Tool Server
//!
//! Newline delimited JSON-RPC 2.0 over stdio, speaking the subset of the
//! Model Context Protocol needed to expose the domain client as tools and
//! resources:
//!
//! - `initialize`, `ping`
//! - `tools/list`, `tools/call`
//! - `resources/list`, `resources/read`
//! - `prompts/list`, `prompts/get`
//!
//! Requests without an `id` are notifications and never get a reply. Tool
//! failures are not protocol errors: they come back as a regular tool result
//! flagged `isError` whose text is the serialized
//! [`ErrorReport`](crate::error::ErrorReport).

pub mod prompts;
pub mod resources;
pub mod tools;

use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::{
    error::Result,
    spotify::{
        SpotifyClient,
        transport::{Credentials, Transport},
    },
};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct PromptParams {
    name: String,
    #[serde(default)]
    arguments: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct ReadParams {
    uri: String,
}

#[derive(Debug)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

pub struct McpServer<T> {
    client: SpotifyClient<T>,
}

impl<T> McpServer<T>
where
    T: Transport + Credentials,
{
    pub fn new(client: SpotifyClient<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SpotifyClient<T> {
        &self.client
    }

    /// Answers requests read from `reader` until it reaches end of input.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("tool server ready");

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let Some(response) = self.handle_line(&line).await else {
                continue;
            };

            let mut out = serde_json::to_string(&response)?;
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
        }

        info!("input closed, shutting down");
        Ok(())
    }

    /// Handles one protocol line. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        let request: RpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "unparseable request");
                return Some(error_response(
                    Value::Null,
                    RpcError::new(PARSE_ERROR, format!("parse error: {e}")),
                ));
            }
        };

        let Some(id) = request.id else {
            debug!(method = %request.method, "notification received");
            return None;
        };

        debug!(method = %request.method, "request received");
        Some(match self.dispatch(&request.method, request.params).await {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
            Err(error) => error_response(id, error),
        })
    }

    /// Runs a tool and wraps the outcome as a tool result.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Value {
        match tools::call_tool(&self.client, name, arguments).await {
            Ok(text) => json!({
                "content": [{ "type": "text", "text": text }],
                "isError": false,
            }),
            Err(e) => {
                warn!(tool = name, code = ?e.code(), error = %e, "tool failed");
                let report = serde_json::to_string_pretty(&e.report())
                    .unwrap_or_else(|_| e.to_string());
                json!({
                    "content": [{ "type": "text", "text": report }],
                    "isError": true,
                })
            }
        }
    }

    async fn dispatch(&self, method: &str, params: Value) -> std::result::Result<Value, RpcError> {
        match method {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {}, "resources": {}, "prompts": {} },
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                },
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tools::list_tools() })),
            "tools/call" => {
                let params: CallParams = from_params(params)?;
                Ok(self.call_tool(&params.name, params.arguments).await)
            }
            "resources/list" => Ok(json!({ "resources": resources::list_resources() })),
            "resources/read" => {
                let params: ReadParams = from_params(params)?;
                if !resources::is_known(&params.uri) {
                    return Err(RpcError::new(
                        INVALID_PARAMS,
                        format!("unknown resource: {}", params.uri),
                    ));
                }

                let text = resources::read_resource(&self.client, &params.uri)
                    .await
                    .map_err(|e| RpcError::new(INTERNAL_ERROR, e.to_string()))?;
                Ok(json!({
                    "contents": [{
                        "uri": params.uri,
                        "mimeType": "application/json",
                        "text": text,
                    }],
                }))
            }
            "prompts/list" => Ok(json!({ "prompts": prompts::list_prompts() })),
            "prompts/get" => {
                let params: PromptParams = from_params(params)?;
                let arguments = params.arguments.unwrap_or_default();
                let prompt = prompts::get_prompt(&params.name, &arguments)
                    .map_err(|e| RpcError::new(INVALID_PARAMS, e.to_string()))?;
                serde_json::to_value(prompt).map_err(|e| RpcError::new(INTERNAL_ERROR, e.to_string()))
            }
            other => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("method not found: {other}"),
            )),
        }
    }
}

fn from_params<P: for<'de> Deserialize<'de>>(params: Value) -> std::result::Result<P, RpcError> {
    serde_json::from_value(params)
        .map_err(|e| RpcError::new(INVALID_PARAMS, format!("invalid params: {e}")))
}

fn error_response(id: Value, error: RpcError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": error.code, "message": error.message },
    })
}
