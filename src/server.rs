use crate::error::Error;
use crate::http::GitHubClient;
use crate::mcp::{wrap_decoded, wrap_error};
use crate::ops::{branches, commits, contents, issues, pulls, repos, search};
use crate::tools::{tool_descriptors, validate_arguments, PROTOCOL_VERSION};
use crate::types::Decoded;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

// Minimal JSON-RPC 2.0 types
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
enum Id {
    Str(String),
    Num(i64),
}

#[derive(Debug, Serialize, Deserialize)]
struct Request {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Value,
    id: Option<Id>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Response {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: Option<Id>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

fn rpc_error(id: Option<Id>, code: i64, message: &str, data: Option<Value>) -> Response {
    Response {
        jsonrpc: "2.0".into(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.into(),
            data,
        }),
        id,
    }
}

fn rpc_ok(id: Option<Id>, result: Value) -> Response {
    Response {
        jsonrpc: "2.0".into(),
        result: Some(result),
        error: None,
        id,
    }
}

#[derive(Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

enum CallError {
    InvalidParams(String),
    Failed(Error),
}

async fn invoke<I, F, Fut>(args: Value, op: F) -> Result<Decoded, CallError>
where
    I: DeserializeOwned,
    F: FnOnce(I) -> Fut,
    Fut: Future<Output = crate::error::Result<Decoded>>,
{
    let input: I =
        serde_json::from_value(args).map_err(|e| CallError::InvalidParams(e.to_string()))?;
    op(input).await.map_err(CallError::Failed)
}

fn quota_status(client: &GitHubClient) -> Decoded {
    let quota = client.quota().map(|q| {
        json!({
            "limit": q.limit,
            "remaining": q.remaining,
            "reset": q.reset_epoch_seconds,
            "reset_at": q.reset_at(),
        })
    });
    Decoded::Json(json!({ "quota": quota }))
}

/// Stdio MCP server over one explicitly constructed client.
///
/// A client that failed to build is kept as its error so discovery still works
/// and every tool call reports the configuration problem.
pub struct Server {
    client: Result<GitHubClient, Error>,
}

impl Server {
    pub fn new(client: Result<GitHubClient, Error>) -> Self {
        Self { client }
    }

    pub async fn run_stdio(&self) -> anyhow::Result<()> {
        info!("Starting gh-rest-mcp stdio server; protocol={}", PROTOCOL_VERSION);
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve newline-delimited or `Content-Length` framed messages until EOF.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                return Ok(());
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let payload = match content_length(trimmed) {
                Some(len) => {
                    // Skip remaining headers up to the blank separator line.
                    loop {
                        line.clear();
                        if reader.read_line(&mut line).await? == 0 || line.trim().is_empty() {
                            break;
                        }
                    }
                    let mut buf = vec![0u8; len];
                    reader.read_exact(&mut buf).await?;
                    String::from_utf8_lossy(&buf).into_owned()
                }
                None => trimmed.to_string(),
            };
            if let Some(resp) = self.handle_message(&payload).await {
                let out = serde_json::to_string(&resp)?;
                writer.write_all(out.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
    }

    async fn handle_message(&self, payload: &str) -> Option<Response> {
        let req: Request = match serde_json::from_str(payload) {
            Ok(r) => r,
            Err(e) => return Some(rpc_error(None, -32700, &format!("Parse error: {}", e), None)),
        };
        debug!("Received method={}", req.method);
        let is_notification = req.id.is_none();
        let resp = self.dispatch(req).await;
        if is_notification {
            None
        } else {
            Some(resp)
        }
    }

    async fn dispatch(&self, req: Request) -> Response {
        match req.method.as_str() {
            "initialize" => handle_initialize(req.id),
            "tools/list" => rpc_ok(req.id, json!({ "tools": tool_descriptors() })),
            "tools/call" => self.handle_tools_call(req.id, req.params).await,
            "ping" => rpc_ok(req.id, json!({})),
            m if m.starts_with("notifications/") => rpc_ok(req.id, Value::Null),
            other => rpc_error(req.id, -32601, &format!("Method not found: {}", other), None),
        }
    }

    async fn handle_tools_call(&self, id: Option<Id>, params: Value) -> Response {
        let Ok(call) = serde_json::from_value::<ToolCallParams>(params) else {
            return rpc_error(id, -32602, "Invalid params", None);
        };
        let Some(descriptor) = tool_descriptors().into_iter().find(|t| t.name == call.name) else {
            return rpc_error(id, -32601, &format!("Tool not found: {}", call.name), None);
        };
        let args = match call.arguments {
            Value::Null => json!({}),
            other => other,
        };
        if let Err(msg) = validate_arguments(&descriptor.input_schema, &args) {
            return rpc_error(id, -32602, &format!("Invalid params: {}", msg), None);
        }
        let client = match &self.client {
            Ok(c) => c,
            Err(e) => return rpc_ok(id, wrap_error(e)),
        };
        match call_tool(client, &call.name, args).await {
            Ok(decoded) => rpc_ok(id, wrap_decoded(decoded)),
            Err(CallError::InvalidParams(msg)) => {
                rpc_error(id, -32602, &format!("Invalid params: {}", msg), None)
            }
            Err(CallError::Failed(e)) => {
                warn!("tool {} failed: {}", call.name, e);
                rpc_ok(id, wrap_error(&e))
            }
        }
    }
}

fn content_length(line: &str) -> Option<usize> {
    let (name, value) = line.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse().ok()
}

fn handle_initialize(id: Option<Id>) -> Response {
    rpc_ok(
        id,
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": "gh-rest-mcp",
                "version": env!("CARGO_PKG_VERSION"),
            }
        }),
    )
}

async fn call_tool(client: &GitHubClient, name: &str, args: Value) -> Result<Decoded, CallError> {
    match name {
        "search_repositories" => invoke(args, |i| repos::search_repositories(client, i)).await,
        "get_repository" => invoke(args, |i| repos::get_repository(client, i)).await,
        "create_repository" => invoke(args, |i| repos::create_repository(client, i)).await,
        "fork_repository" => invoke(args, |i| repos::fork_repository(client, i)).await,
        "list_issues" => invoke(args, |i| issues::list_issues(client, i)).await,
        "get_issue" => invoke(args, |i| issues::get_issue(client, i)).await,
        "create_issue" => invoke(args, |i| issues::create_issue(client, i)).await,
        "update_issue" => invoke(args, |i| issues::update_issue(client, i)).await,
        "add_issue_comment" => invoke(args, |i| issues::add_issue_comment(client, i)).await,
        "list_issue_comments" => invoke(args, |i| issues::list_issue_comments(client, i)).await,
        "list_pull_requests" => invoke(args, |i| pulls::list_pull_requests(client, i)).await,
        "get_pull_request" => invoke(args, |i| pulls::get_pull_request(client, i)).await,
        "create_pull_request" => invoke(args, |i| pulls::create_pull_request(client, i)).await,
        "update_pull_request" => invoke(args, |i| pulls::update_pull_request(client, i)).await,
        "list_pull_request_files" => {
            invoke(args, |i| pulls::list_pull_request_files(client, i)).await
        }
        "get_pull_request_diff" => invoke(args, |i| pulls::get_pull_request_diff(client, i)).await,
        "create_pull_request_review" => {
            invoke(args, |i| pulls::create_pull_request_review(client, i)).await
        }
        "list_branches" => invoke(args, |i| branches::list_branches(client, i)).await,
        "create_branch" => invoke(args, |i| branches::create_branch(client, i)).await,
        "get_file_contents" => invoke(args, |i| contents::get_file_contents(client, i)).await,
        "push_files" => invoke(args, |i| contents::push_files(client, i)).await,
        "list_commits" => invoke(args, |i| commits::list_commits(client, i)).await,
        "get_commit" => invoke(args, |i| commits::get_commit(client, i)).await,
        "search_code" => invoke(args, |i| search::search_code(client, i)).await,
        "search_issues" => invoke(args, |i| search::search_issues(client, i)).await,
        "search_users" => invoke(args, |i| search::search_users(client, i)).await,
        "get_rate_limit_status" => Ok(quota_status(client)),
        other => Err(CallError::InvalidParams(format!("unknown tool {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigError};

    async fn run(server: &Server, input: &str) -> Vec<Value> {
        let mut out = Vec::new();
        server.serve(input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn offline_server() -> Server {
        Server::new(Err(Error::Config(ConfigError::MissingToken)))
    }

    #[tokio::test]
    async fn initialize_and_list_without_token() {
        let server = offline_server();
        let input = concat!(
            r#"{"jsonrpc":"2.0","method":"initialize","id":1}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"tools/list","id":2}"#,
            "\n"
        );
        let out = run(&server, input).await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["result"]["protocolVersion"], PROTOCOL_VERSION);
        let tools = out[1]["result"]["tools"].as_array().unwrap();
        assert!(tools.iter().any(|t| t["name"] == "list_issues"));
        assert!(tools.iter().any(|t| t["name"] == "get_rate_limit_status"));
    }

    #[tokio::test]
    async fn content_length_framing_is_accepted() {
        let server = offline_server();
        let msg = r#"{"jsonrpc":"2.0","method":"ping","id":"a"}"#;
        let input = format!("Content-Length: {}\r\n\r\n{}", msg.len(), msg);
        let out = run(&server, &input).await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["id"], "a");
        assert_eq!(out[0]["result"], json!({}));
    }

    #[tokio::test]
    async fn tool_call_reports_config_error() {
        let server = offline_server();
        let input = r#"{"jsonrpc":"2.0","method":"tools/call","id":3,"params":{"name":"get_issue","arguments":{"owner":"o","repo":"r","issue_number":1}}}"#;
        let out = run(&server, input).await;
        assert_eq!(out[0]["result"]["isError"], true);
        assert_eq!(
            out[0]["result"]["structuredContent"]["error"]["code"],
            "config_error"
        );
    }

    #[tokio::test]
    async fn unknown_tool_and_method() {
        let server = offline_server();
        let input = concat!(
            r#"{"jsonrpc":"2.0","method":"tools/call","id":1,"params":{"name":"nope"}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"bogus","id":2}"#,
            "\n",
            "not json\n"
        );
        let out = run(&server, input).await;
        assert_eq!(out[0]["error"]["code"], -32601);
        assert_eq!(out[1]["error"]["code"], -32601);
        assert_eq!(out[2]["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn bad_arguments_are_invalid_params() {
        let cfg = Config::builder()
            .token("t")
            .api_url("http://127.0.0.1:9")
            .build_with(|_| None)
            .unwrap();
        let server = Server::new(GitHubClient::new(cfg));
        let input = r#"{"jsonrpc":"2.0","method":"tools/call","id":1,"params":{"name":"get_issue","arguments":{"owner":"o"}}}"#;
        let out = run(&server, input).await;
        assert_eq!(out[0]["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn arguments_outside_the_schema_are_invalid_params() {
        let server = offline_server();
        let calls = [
            json!({"owner": "o", "repo": "r", "per_pge": 5}),
            json!({"owner": "o", "repo": "r", "per_page": 0}),
            json!({"owner": "o", "repo": "r", "per_page": 101}),
            json!({"owner": "o", "repo": "r", "page": 0}),
            json!({"owner": "o", "repo": "r", "state": "bogus"}),
        ];
        let input: String = calls
            .iter()
            .enumerate()
            .map(|(i, args)| {
                let req = json!({
                    "jsonrpc": "2.0", "method": "tools/call", "id": i,
                    "params": {"name": "list_issues", "arguments": args}
                });
                format!("{req}\n")
            })
            .collect();
        let out = run(&server, &input).await;
        assert_eq!(out.len(), calls.len());
        for resp in &out {
            assert_eq!(resp["error"]["code"], -32602, "{resp}");
        }
        assert!(out[0]["error"]["message"].as_str().unwrap().contains("per_pge"));
    }

    #[tokio::test]
    async fn rate_limit_status_starts_empty() {
        let cfg = Config::builder()
            .token("t")
            .build_with(|_| None)
            .unwrap();
        let server = Server::new(GitHubClient::new(cfg));
        let input = r#"{"jsonrpc":"2.0","method":"tools/call","id":1,"params":{"name":"get_rate_limit_status"}}"#;
        let out = run(&server, input).await;
        assert_eq!(out[0]["result"]["structuredContent"], json!({"quota": null}));
    }
}
