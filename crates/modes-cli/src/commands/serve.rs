//! Line-delimited JSON-RPC MCP server on stdio
//!
//! Handles: mcp-modes serve

use modes_core::ModeSwitcher;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::protocol::{
    error, success, InitializeRequest, InitializeResponse, JsonRpcRequest, JsonRpcResponse,
    ServerCapabilities, ServerInfo, ToolsCallRequest, INVALID_PARAMS, MCP_PROTOCOL_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::tools::{self, ToolCallError};

const INSTRUCTIONS: &str = "Switch between mode profiles, each a set of enabled connectors. \
Call switch_mode without confirm first and show the user the warning: confirming restarts the application.";

/// Serve requests until stdin closes
///
/// Requests are handled one at a time, in order.
///
/// # Errors
/// Returns an error if stdin or stdout fails
pub async fn run(switcher: &ModeSwitcher) -> anyhow::Result<()> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut line = Vec::new();

    tracing::info!(live_config = %switcher.paths().live_config.display(), "serving on stdio");

    loop {
        line.clear();
        let n = reader.read_until(b'\n', &mut line).await?;
        if n == 0 {
            break;
        }

        let Some(response) = handle_bytes(switcher, &line) else {
            continue;
        };

        stdout
            .write_all(serde_json::to_string(&response)?.as_bytes())
            .await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

/// Handle one raw line; input that is not UTF-8 is a parse error
pub fn handle_bytes(switcher: &ModeSwitcher, bytes: &[u8]) -> Option<JsonRpcResponse> {
    match std::str::from_utf8(bytes) {
        Ok(line) => handle_line(switcher, line),
        Err(e) => {
            tracing::warn!(error = %e, "request is not valid UTF-8");
            Some(error(Value::Null, PARSE_ERROR, format!("parse error: {e}")))
        }
    }
}

/// Handle one line of input; notifications and blank lines get no response
pub fn handle_line(switcher: &ModeSwitcher, line: &str) -> Option<JsonRpcResponse> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let request = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable request");
            return Some(error(Value::Null, PARSE_ERROR, format!("parse error: {e}")));
        }
    };

    let Some(id) = request.id.clone() else {
        tracing::debug!(method = %request.method, "notification");
        return None;
    };

    Some(handle_request(switcher, id, request))
}

fn handle_request(switcher: &ModeSwitcher, id: Value, mut request: JsonRpcRequest) -> JsonRpcResponse {
    if request.params.is_null() {
        request.params = json!({});
    }

    match request.method.as_str() {
        "initialize" => match serde_json::from_value::<InitializeRequest>(request.params) {
            Ok(init) => {
                if let Some(client) = init.client_info {
                    tracing::info!(
                        client = %client.name,
                        version = %client.version,
                        protocol = ?init.protocol_version,
                        "client connected"
                    );
                }
                to_response(id, &initialize_response())
            }
            Err(e) => error(id, INVALID_PARAMS, format!("invalid initialize params: {e}")),
        },
        "ping" => success(id, json!({})),
        "tools/list" => to_response(id, &tools::list_response()),
        "tools/call" => match serde_json::from_value::<ToolsCallRequest>(request.params) {
            Ok(call) => match tools::call_tool(switcher, &call.name, call.arguments) {
                Ok(result) => to_response(id, &result),
                Err(ToolCallError::UnknownTool(name)) => {
                    error(id, METHOD_NOT_FOUND, format!("unknown tool: {name}"))
                }
                Err(ToolCallError::InvalidArguments(msg)) => {
                    error(id, INVALID_PARAMS, format!("invalid arguments: {msg}"))
                }
            },
            Err(e) => error(id, INVALID_PARAMS, format!("invalid tools/call params: {e}")),
        },
        other => error(id, METHOD_NOT_FOUND, format!("method not found: {other}")),
    }
}

fn initialize_response() -> InitializeResponse {
    InitializeResponse {
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities::default(),
        server_info: ServerInfo {
            name: "mcp-mode-switcher".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        instructions: INSTRUCTIONS.to_string(),
    }
}

fn to_response(id: Value, result: &impl serde::Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => success(id, value),
        Err(e) => error(id, -32603, format!("internal error: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modes_core::{ModePaths, NoopRestarter};
    use tempfile::TempDir;

    fn switcher(dir: &TempDir) -> ModeSwitcher {
        ModeSwitcher::new(ModePaths::from_app_dir(dir.path()), Box::new(NoopRestarter))
    }

    #[test]
    fn test_blank_lines_and_notifications_are_silent() {
        let dir = TempDir::new().unwrap();
        let switcher = switcher(&dir);
        assert!(handle_line(&switcher, "   \n").is_none());
        assert!(handle_line(
            &switcher,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#
        )
        .is_none());
    }

    #[test]
    fn test_parse_error() {
        let dir = TempDir::new().unwrap();
        let response = handle_line(&switcher(&dir), "{not json").unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let switcher = switcher(&dir);

        let response = handle_bytes(&switcher, b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"\xff\"}\n").unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);

        // Valid lines still go through
        let response = handle_bytes(&switcher, b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n").unwrap();
        assert_eq!(response.id, 2);
    }

    #[test]
    fn test_initialize() {
        let dir = TempDir::new().unwrap();
        let response = handle_line(
            &switcher(&dir),
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26","capabilities":{},"clientInfo":{"name":"test","version":"1"}}}"#,
        )
        .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "mcp-mode-switcher");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[test]
    fn test_tools_list_and_call() {
        let dir = TempDir::new().unwrap();
        let switcher = switcher(&dir);

        let response = handle_line(&switcher, r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).unwrap();
        assert_eq!(response.result.unwrap()["tools"].as_array().unwrap().len(), 5);

        let response = handle_line(
            &switcher,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"list_modes","arguments":{}}}"#,
        )
        .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["isError"], false);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("No modes found."));
    }

    #[test]
    fn test_unknown_method_and_tool() {
        let dir = TempDir::new().unwrap();
        let switcher = switcher(&dir);

        let response = handle_line(&switcher, r#"{"jsonrpc":"2.0","id":4,"method":"resources/list"}"#).unwrap();
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);

        let response = handle_line(
            &switcher,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"nope"}}"#,
        )
        .unwrap();
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }
}
