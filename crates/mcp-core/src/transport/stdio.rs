//! Stdio transport: newline-delimited JSON-RPC over stdin/stdout.
//!
//! Generalizes the teacher's `StdioTransport` (single global server,
//! line-by-line read loop, mutex-guarded writer) with a single
//! lazily-created session for the process lifetime (spec §4.4 "stdio:
//! exactly one session per process"), a 1 MiB line cap that maps to a
//! parse error instead of growing the read buffer unboundedly, and
//! cancellation-driven shutdown (grounded on `clawde-io-apps`'s
//! `make_shutdown_future`/`tokio::select!` pattern) instead of relying on
//! EOF alone.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, OnceCell};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{Result, Transport, TransportKind};
use crate::dispatcher::Dispatcher;
use crate::protocol::{ErrorCode, JsonRpcResponse};
use crate::session::{Outbound, Session};

/// Oversized stdio lines are rejected as a parse error rather than read
/// without bound (the teacher's loop has no cap at all).
const MAX_LINE_BYTES: usize = 1024 * 1024;

/// stdio transport: one session for the whole process. Responses and
/// server-initiated notifications are interleaved on stdout behind a
/// shared mutex so concurrent writers never interleave partial lines;
/// stderr (via `tracing`) carries structured logs only.
pub struct StdioTransport {
    dispatcher: Arc<Dispatcher>,
    stdout: Arc<Mutex<tokio::io::Stdout>>,
    session: OnceCell<Arc<Session>>,
}

impl StdioTransport {
    /// Build a stdio transport over `dispatcher`'s shared session store.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            stdout: Arc::new(Mutex::new(tokio::io::stdout())),
            session: OnceCell::new(),
        }
    }

    async fn session(&self) -> Arc<Session> {
        Arc::clone(
            self.session
                .get_or_init(|| async { self.dispatcher.sessions().create().await })
                .await,
        )
    }

    async fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut stdout = self.stdout.lock().await;
        stdout.write_all(line.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await
    }
}

/// Delivers server-initiated notifications over the same stdout writer the
/// request/response loop uses, so lines never interleave.
struct StdoutOutbound {
    stdout: Arc<Mutex<tokio::io::Stdout>>,
}

#[async_trait]
impl Outbound for StdoutOutbound {
    async fn send(&self, _session_id: &str, message: Value) {
        let Ok(line) = serde_json::to_string(&message) else {
            return;
        };
        let mut stdout = self.stdout.lock().await;
        if stdout.write_all(line.as_bytes()).await.is_err() {
            return;
        }
        if stdout.write_all(b"\n").await.is_err() {
            return;
        }
        let _ = stdout.flush().await;
    }
}

#[async_trait]
impl Transport for StdioTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Stdio
    }

    async fn listen(&self, shutdown: CancellationToken) -> Result<()> {
        let session = self.session().await;
        let outbound: Arc<dyn Outbound> = Arc::new(StdoutOutbound {
            stdout: Arc::clone(&self.stdout),
        });

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = tokio::select! {
                biased;

                () = shutdown.cancelled() => {
                    info!("shutdown signal received, stopping stdio transport");
                    break;
                }

                result = reader.read_line(&mut line) => result?,
            };

            if bytes_read == 0 {
                info!("stdin closed, shutting down");
                break;
            }

            if line.len() > MAX_LINE_BYTES {
                warn!(len = line.len(), cap = MAX_LINE_BYTES, "oversized line rejected as a parse error");
                let response = JsonRpcResponse::error(
                    Value::Null,
                    ErrorCode::ParseError.as_i32(),
                    "request line exceeds the maximum size",
                );
                if let Ok(encoded) = serde_json::to_string(&response) {
                    self.write_line(&encoded).await?;
                }
                continue;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(response) = self.dispatcher.dispatch_frame(trimmed, &session, &outbound).await {
                self.write_line(&response).await?;
            }
        }

        Ok(())
    }
}
