//! S4 (spec §8): two POSTs from the same cookie-scoped SSE client land
//! their replies on the one SSE stream that client opened, in order.
//!
//! Grounded on `clawde-io-apps`'s `tests/health.rs`/`tests/integration_test.rs`
//! (free-port binding, live-server-in-a-background-task pattern); the
//! teacher has no live-HTTP integration tests of its own to draw from
//! since its SSE transport is only unit-tested against its handler
//! functions directly.

use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use mcp_core::dispatcher::{Dispatcher, ServerIdentity};
use mcp_core::protocol::ToolCallResult;
use mcp_core::registry::{PromptRegistry, ProviderError, ResourceRegistry, Tool, ToolRegistry};
use mcp_core::session::{InMemorySessionStore, RequestContext, SessionStore};
use mcp_core::transport::{SseConfig, SseTransport, Transport};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Counts calls so responses are distinguishable by sequence.
struct CounterTool {
    count: Mutex<u64>,
}

#[async_trait]
impl Tool for CounterTool {
    fn name(&self) -> &str {
        "counter"
    }
    fn description(&self) -> &str {
        "returns an incrementing counter"
    }
    fn input_schema(&self) -> Value {
        json!({"type": "object"})
    }
    async fn call(&self, _args: Value, _ctx: &RequestContext) -> Result<ToolCallResult, ProviderError> {
        let mut count = self.count.lock().await;
        *count += 1;
        Ok(ToolCallResult::text(count.to_string()))
    }
}

fn free_port() -> u16 {
    StdTcpListener::bind("127.0.0.1:0")
        .expect("bind an ephemeral port")
        .local_addr()
        .expect("read local addr")
        .port()
}

async fn spawn_sse_server() -> (u16, CancellationToken) {
    let tools = Arc::new(ToolRegistry::new());
    tools
        .register(Arc::new(CounterTool { count: Mutex::new(0) }))
        .await;

    let dispatcher = Arc::new(Dispatcher::new(
        tools,
        Arc::new(PromptRegistry::new()),
        Arc::new(ResourceRegistry::new()),
        Arc::new(InMemorySessionStore::new()) as Arc<dyn SessionStore>,
        ServerIdentity {
            name: "sse-test-server".to_string(),
            version: "0.0.0".to_string(),
        },
    ));

    let port = free_port();
    let transport = SseTransport::new(dispatcher, SseConfig::new(port));
    let shutdown = CancellationToken::new();
    let listen_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = transport.listen(listen_shutdown).await;
    });

    // Give axum a moment to bind before the test issues its first request.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (port, shutdown)
}

#[tokio::test]
async fn s4_sse_session_stickiness() {
    let (port, shutdown) = spawn_sse_server().await;

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("build reqwest client");

    let sse_response = client
        .get(format!("http://127.0.0.1:{port}/sse"))
        .send()
        .await
        .expect("open SSE stream");
    assert!(sse_response.status().is_success());

    let mut stream = sse_response.bytes_stream();

    // First event is the "endpoint" announcement carrying ?sessionId=.
    let first_chunk = stream
        .next()
        .await
        .expect("stream yields at least one chunk")
        .expect("chunk is not an error");
    let first_chunk = String::from_utf8_lossy(&first_chunk);
    assert!(first_chunk.contains("event: endpoint"));
    let session_id = first_chunk
        .lines()
        .find_map(|line| line.strip_prefix("data: /messages?sessionId="))
        .expect("endpoint event carries a sessionId")
        .trim()
        .to_string();

    let call = |id: &'static str| {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": {"name": "counter", "arguments": {}}
        })
    };

    // initialize first, or the session-gate rejects the tool call.
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
    let post_url = format!("http://127.0.0.1:{port}/messages?sessionId={session_id}");
    let status = client.post(&post_url).json(&init).send().await.expect("POST initialize").status();
    assert_eq!(status, reqwest::StatusCode::ACCEPTED);

    let status = client
        .post(&post_url)
        .json(&call("first"))
        .send()
        .await
        .expect("POST first call")
        .status();
    assert_eq!(status, reqwest::StatusCode::ACCEPTED);

    let status = client
        .post(&post_url)
        .json(&call("second"))
        .send()
        .await
        .expect("POST second call")
        .status();
    assert_eq!(status, reqwest::StatusCode::ACCEPTED);

    // Collect SSE "message" events until both replies have arrived.
    let mut seen_ids = Vec::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while seen_ids.len() < 3 && tokio::time::Instant::now() < deadline {
        let Some(Ok(chunk)) = tokio::time::timeout(Duration::from_millis(500), stream.next())
            .await
            .ok()
            .flatten()
        else {
            continue;
        };
        let text = String::from_utf8_lossy(&chunk);
        for line in text.lines() {
            if let Some(data) = line.strip_prefix("data: ") {
                if let Ok(value) = serde_json::from_str::<Value>(data) {
                    if let Some(id) = value["id"].as_str() {
                        seen_ids.push(id.to_string());
                    }
                }
            }
        }
    }

    assert!(seen_ids.contains(&"init".to_string()));
    assert!(seen_ids.contains(&"first".to_string()));
    assert!(seen_ids.contains(&"second".to_string()));

    shutdown.cancel();
}
