use super::protocol::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
use super::tools::{tool_definitions, ToolContext};
use crate::figma::FigmaSource;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "figma-testcase-generator";

pub struct McpServer<S: FigmaSource> {
    tools: ToolContext<S>,
}

impl<S: FigmaSource> McpServer<S> {
    pub fn new(tools: ToolContext<S>) -> Self {
        Self { tools }
    }

    /// Handles one line of input; `None` means nothing is written back
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Unparseable message");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };
        // Well-formed JSON that is not a request object, batches included
        let request_id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Invalid request");
                return Some(JsonRpcResponse::failure(
                    request_id,
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        if request.is_notification() {
            debug!(method = %request.method, "Ignoring notification");
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                id,
                INVALID_REQUEST,
                format!("Unsupported jsonrpc version '{}'", request.jsonrpc),
            ));
        }

        Some(self.dispatch(id, &request.method, request.params).await)
    }

    async fn dispatch(&self, id: Value, method: &str, params: Option<Value>) -> JsonRpcResponse {
        match method {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "serverInfo": {"name": SERVER_NAME, "version": crate::VERSION},
                }),
            ),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({"tools": tool_definitions()})),
            "tools/call" => {
                let params = params.unwrap_or(Value::Null);
                let Some(name) = params.get("name").and_then(Value::as_str) else {
                    return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing tool name");
                };
                let args = params
                    .get("arguments")
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                JsonRpcResponse::success(id, self.call_tool(name, &args).await)
            }
            other => JsonRpcResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }
    }

    async fn call_tool(&self, name: &str, args: &Value) -> Value {
        let (payload, is_error) = match self.tools.call(name, args).await {
            Ok(value) => (value, false),
            Err(e) => {
                warn!(tool = name, error = %e, "Tool call failed");
                (json!({"success": false, "error": e.to_string()}), true)
            }
        };
        let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        json!({
            "content": [{"type": "text", "text": text}],
            "isError": is_error,
        })
    }
}

/// Serves line-delimited JSON-RPC on stdin/stdout until stdin closes
pub async fn serve<S: FigmaSource>(server: McpServer<S>) -> Result<()> {
    info!(name = SERVER_NAME, version = crate::VERSION, "MCP server listening on stdio");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(response) = server.handle_line(&line).await else {
            continue;
        };
        let mut out = serde_json::to_string(&response).context("Failed to encode response")?;
        out.push('\n');
        stdout
            .write_all(out.as_bytes())
            .await
            .context("Failed to write to stdout")?;
        stdout.flush().await.context("Failed to flush stdout")?;
    }

    info!("stdin closed, MCP server stopping");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::{FigmaFile, FigmaNode, FixtureSource};
    use crate::testcase::{RulesConfig, TestCaseGenerator};
    use tempfile::TempDir;

    fn server(dir: &TempDir) -> McpServer<FixtureSource> {
        let file = FigmaFile::new(
            FigmaNode::new("DOCUMENT", "Document")
                .with_children(vec![FigmaNode::text("cta", "Login button")]),
        );
        McpServer::new(ToolContext::new(
            FixtureSource::new(file),
            TestCaseGenerator::new(RulesConfig::embedded().unwrap()),
            dir.path(),
        ))
    }

    async fn request(server: &McpServer<FixtureSource>, message: Value) -> JsonRpcResponse {
        server
            .handle_line(&message.to_string())
            .await
            .expect("a response")
    }

    #[tokio::test]
    async fn test_initialize() {
        let dir = TempDir::new().unwrap();
        let resp = request(
            &server(&dir),
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        )
        .await;

        let result = resp.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let dir = TempDir::new().unwrap();
        let resp = server(&dir)
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let dir = TempDir::new().unwrap();
        let resp = request(
            &server(&dir),
            json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"}),
        )
        .await;
        assert_eq!(resp.id, json!("a"));
        assert_eq!(resp.result.unwrap()["tools"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_tool_call_success_is_text_content() {
        let dir = TempDir::new().unwrap();
        let resp = request(
            &server(&dir),
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": {
                    "name": "parse_figma_url",
                    "arguments": {"figma_url": "https://www.figma.com/file/abc123/Landing"}
                }
            }),
        )
        .await;

        let result = resp.result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["type"], "text");
        let payload: Value =
            serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(payload["file_id"], "abc123");
    }

    #[tokio::test]
    async fn test_tool_call_failure_is_reported_in_content() {
        let dir = TempDir::new().unwrap();
        let resp = request(
            &server(&dir),
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {"name": "parse_figma_url", "arguments": {"figma_url": "not a link"}}
            }),
        )
        .await;

        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        let payload: Value =
            serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(payload["success"], false);
        assert!(payload["error"].as_str().unwrap().contains("not a link"));
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let dir = TempDir::new().unwrap();
        let server = server(&dir);

        let resp = server.handle_line("{not json").await.unwrap();
        assert_eq!(resp.error.unwrap().code, PARSE_ERROR);

        let resp = request(&server, json!({"jsonrpc": "2.0", "id": 4, "method": "resources/list"})).await;
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);

        let resp = request(&server, json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call"})).await;
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);

        let resp = request(&server, json!({"jsonrpc": "1.0", "id": 6, "method": "ping"})).await;
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_non_request_json_is_invalid_request() {
        let dir = TempDir::new().unwrap();
        let server = server(&dir);

        let resp = request(&server, json!([{"jsonrpc": "2.0", "id": 1, "method": "ping"}])).await;
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(resp.id, Value::Null);

        let resp = request(&server, json!({"jsonrpc": "2.0", "id": 8})).await;
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(resp.id, json!(8));
    }

    #[tokio::test]
    async fn test_null_id_ping_gets_a_reply() {
        let dir = TempDir::new().unwrap();
        let resp = server(&dir)
            .handle_line(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .await
            .expect("null id is a request, not a notification");
        assert_eq!(resp.id, Value::Null);
        assert!(resp.error.is_none());
        assert_eq!(resp.result, Some(json!({})));
    }
}
