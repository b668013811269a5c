//! MCP request dispatch and the stdio serving loop.
//!
//! Every request line yields exactly one response line (notifications
//! yield none). Tool faults are normalized here: they become error tool
//! results, never JSON-RPC errors and never process termination.

use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::catalog;
use crate::error::GatewayResult;
use crate::gateway::Gateway;
use crate::jsonrpc::{
    error_response, success_response, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    JSONRPC_VERSION,
};
use crate::protocol::{
    CallToolParams, CallToolResult, Implementation, InitializeParams, InitializeResult,
    ListToolsResult, ServerCapabilities, Tool, ToolsCapability, LATEST_PROTOCOL_VERSION,
    METHOD_INITIALIZE, METHOD_PING, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST,
    SUPPORTED_PROTOCOL_VERSIONS,
};

pub struct McpServer {
    gateway: Gateway,
    tools: Vec<Tool>,
}

impl McpServer {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway, tools: catalog::tools() }
    }

    /// Process one decoded protocol message; `None` means no response is
    /// owed (notification).
    pub async fn process_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "unparseable request line");
                return Some(error_response(
                    None,
                    JsonRpcError::parse_error().with_data(json!({"details": e.to_string()})),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(error_response(
                request.id,
                JsonRpcError::invalid_request()
                    .with_data(json!({"message": "Invalid JSON-RPC version"})),
            ));
        }

        if request.id.is_none() {
            debug!(method = %request.method, "notification ignored");
            return None;
        }

        let response = match request.method.as_str() {
            METHOD_INITIALIZE => self.handle_initialize(&request),
            METHOD_PING => success_response(request.id.clone(), json!({})),
            METHOD_TOOLS_LIST => self.handle_tools_list(&request),
            METHOD_TOOLS_CALL => self.handle_tools_call(&request).await,
            other => error_response(
                request.id.clone(),
                JsonRpcError::method_not_found().with_data(json!({"method": other})),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let requested_version = request
            .params
            .as_ref()
            .and_then(|params| {
                serde_json::from_value::<InitializeParams>(params.clone()).ok()
            })
            .map(|params| params.protocol_version)
            .unwrap_or_default();

        let protocol_version = if SUPPORTED_PROTOCOL_VERSIONS.contains(&requested_version.as_str())
        {
            requested_version
        } else {
            LATEST_PROTOCOL_VERSION.to_string()
        };

        let result = InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: None },
            },
            server_info: Implementation {
                name: "trello-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        self.respond(request, &result)
    }

    fn handle_tools_list(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let result = ListToolsResult { tools: self.tools.clone() };
        self.respond(request, &result)
    }

    async fn handle_tools_call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let params = match &request.params {
            Some(params) => params.clone(),
            None => {
                return error_response(
                    request.id.clone(),
                    JsonRpcError::invalid_params()
                        .with_data(json!({"message": "missing params for tools/call"})),
                )
            }
        };
        let call: CallToolParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => {
                return error_response(
                    request.id.clone(),
                    JsonRpcError::invalid_params().with_data(json!({"details": e.to_string()})),
                )
            }
        };

        let arguments = call.arguments.unwrap_or_else(|| json!({}));
        debug!(tool = %call.name, "dispatching tool call");

        // The fault boundary: validation and remote faults both land here
        // and become error results on the wire.
        let result = match self.gateway.call(&call.name, &arguments).await {
            Ok(result) => result,
            Err(err) => {
                warn!(tool = %call.name, error = %err, "tool call failed");
                CallToolResult::error(format!("Error: {err}"))
            }
        };
        self.respond(request, &result)
    }

    fn respond(&self, request: &JsonRpcRequest, result: &impl serde::Serialize) -> JsonRpcResponse {
        match serde_json::to_value(result) {
            Ok(value) => success_response(request.id.clone(), value),
            Err(e) => error_response(
                request.id.clone(),
                JsonRpcError::internal_error().with_data(json!({"details": e.to_string()})),
            ),
        }
    }
}

/// Serve MCP over stdio until stdin closes.
///
/// One JSON-RPC message per line in, one response per request out; logs go
/// to stderr only, stdout stays protocol-clean.
pub async fn serve_stdio(server: McpServer) -> GatewayResult<()> {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();
    let mut stdout = tokio::io::stdout();

    info!("trello-mcp gateway running on stdio");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(response) = server.process_message(line).await {
            let payload = serde_json::to_string(&response)?;
            stdout.write_all(payload.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}
