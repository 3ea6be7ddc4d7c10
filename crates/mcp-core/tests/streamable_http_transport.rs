//! C8: the streamable HTTP transport's websocket path carries a full
//! request/reply round trip, and its `POST /messages` fallback replies
//! inline in the HTTP body when no socket is attached to the session.
//!
//! Grounded on `clawde-io-apps`'s `tests/integration_test.rs` (`connect_async`
//! plus a loop-until-a-response-with-this-id helper); this transport has no
//! teacher counterpart at all, since the teacher never implements
//! websockets.

use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use mcp_core::dispatcher::{Dispatcher, ServerIdentity};
use mcp_core::protocol::ToolCallResult;
use mcp_core::registry::{PromptRegistry, ProviderError, ResourceRegistry, Tool, ToolRegistry};
use mcp_core::session::{InMemorySessionStore, RequestContext, SessionStore};
use mcp_core::transport::{StreamableHttpConfig, StreamableHttpTransport, Transport};
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "echoes its message argument"
    }
    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {"message": {"type": "string"}}})
    }
    async fn call(&self, args: Value, _ctx: &RequestContext) -> Result<ToolCallResult, ProviderError> {
        let message = args.get("message").and_then(Value::as_str).unwrap_or_default();
        Ok(ToolCallResult::text(message))
    }
}

fn free_port() -> u16 {
    StdTcpListener::bind("127.0.0.1:0")
        .expect("bind an ephemeral port")
        .local_addr()
        .expect("read local addr")
        .port()
}

async fn spawn_server() -> (u16, CancellationToken) {
    let tools = Arc::new(ToolRegistry::new());
    tools.register(Arc::new(EchoTool)).await;

    let dispatcher = Arc::new(Dispatcher::new(
        tools,
        Arc::new(PromptRegistry::new()),
        Arc::new(ResourceRegistry::new()),
        Arc::new(InMemorySessionStore::new()) as Arc<dyn SessionStore>,
        ServerIdentity {
            name: "ws-test-server".to_string(),
            version: "0.0.0".to_string(),
        },
    ));

    let port = free_port();
    let transport = StreamableHttpTransport::new(dispatcher, StreamableHttpConfig::new(port));
    let shutdown = CancellationToken::new();
    let listen_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = transport.listen(listen_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (port, shutdown)
}

#[tokio::test]
async fn c8_websocket_round_trip() {
    let (port, shutdown) = spawn_server().await;

    let (mut ws, _response) = tokio_tungstenite::connect_async(format!("ws://127.0.0.1:{port}/ws"))
        .await
        .expect("connect websocket");

    let init = json!({
        "jsonrpc": "2.0",
        "id": "init",
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "clientInfo": {"name": "t", "version": "0"},
            "capabilities": {}
        }
    });
    ws.send(Message::Text(init.to_string().into())).await.expect("send initialize");
    let reply = recv_json(&mut ws).await;
    assert_eq!(reply["id"], "init");
    assert_eq!(reply["result"]["protocolVersion"], "2024-11-05");

    let call = json!({
        "jsonrpc": "2.0",
        "id": "call",
        "method": "tools/call",
        "params": {"name": "echo", "arguments": {"message": "over the wire"}}
    });
    ws.send(Message::Text(call.to_string().into())).await.expect("send tools/call");
    let reply = recv_json(&mut ws).await;
    assert_eq!(reply["id"], "call");
    assert_eq!(reply["result"]["content"][0]["text"], "over the wire");

    shutdown.cancel();
}

async fn recv_json(
    ws: &mut tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
) -> Value {
    loop {
        match tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("response within timeout")
            .expect("stream not closed")
            .expect("no websocket error")
        {
            Message::Text(text) => return serde_json::from_str(&text).expect("valid JSON reply"),
            _ => continue,
        }
    }
}

/// A POST with no websocket attached to the session replies inline in the
/// HTTP response body instead of waiting for a socket that will never come
/// (spec §4.4's fallback path).
///
/// `POST /messages` never mints a session on its own (only the websocket
/// upgrade does), so this first opens and immediately drops a websocket to
/// mint a session and recover its id, then exercises the POST path against
/// that now-socket-less session.
#[tokio::test]
async fn post_fallback_replies_inline_without_a_socket() {
    let (port, shutdown) = spawn_server().await;

    let (ws, response) = tokio_tungstenite::connect_async(format!("ws://127.0.0.1:{port}/ws"))
        .await
        .expect("connect websocket to mint a session");
    let session_id = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .find_map(|v| {
            let v = v.to_str().ok()?;
            v.strip_prefix("mcp_session_id=")?.split(';').next().map(str::to_string)
        })
        .expect("upgrade response sets a session cookie");
    drop(ws);
    // Let the server side observe the close and drop the mailbox from its
    // live-sockets map before the POST below.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = reqwest::Client::new();
    let init = json!({
        "jsonrpc": "2.0",
        "id": "init",
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "clientInfo": {"name": "t", "version": "0"},
            "capabilities": {}
        }
    });
    let response = client
        .post(format!("http://127.0.0.1:{port}/messages?sessionId={session_id}"))
        .json(&init)
        .send()
        .await
        .expect("POST initialize");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("JSON reply body");
    assert_eq!(body["id"], "init");

    let call = json!({
        "jsonrpc": "2.0",
        "id": "call",
        "method": "tools/call",
        "params": {"name": "echo", "arguments": {"message": "inline"}}
    });
    let response = client
        .post(format!("http://127.0.0.1:{port}/messages?sessionId={session_id}"))
        .json(&call)
        .send()
        .await
        .expect("POST tools/call");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("JSON reply body");
    assert_eq!(body["id"], "call");
    assert_eq!(body["result"]["content"][0]["text"], "inline");

    shutdown.cancel();
}
