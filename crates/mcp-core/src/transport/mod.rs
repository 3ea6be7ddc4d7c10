//! Transport layer: stdio, SSE, and streamable-HTTP bindings over one
//! shared [`Dispatcher`](crate::dispatcher::Dispatcher) (spec §4.4).
//!
//! Every transport owns the connection/session plumbing for its wire
//! format and forwards decoded frames to `Dispatcher::dispatch_frame`; none
//! of them know about the method catalog. Each transport also exposes an
//! [`Outbound`](crate::session::Outbound) sink so the dispatcher can push
//! server-initiated notifications (progress, resource updates) back out
//! over whichever channel the session arrived on.
//!
//! Transports take `Arc<Dispatcher>` at construction rather than a separate
//! `SetSessionStore` setter called before `listen`: the dispatcher already
//! owns the one `SessionStore` a server runs (spec §4.3), so there is
//! nothing left for a transport to be handed separately once it has the
//! dispatcher.

mod error;
mod mailbox;
mod sse;
mod stdio;
mod streamable_http;

pub use error::TransportError;
pub use mailbox::{Mailbox, MAILBOX_CAPACITY};
pub use sse::{SseConfig, SseTransport};
pub use stdio::StdioTransport;
pub use streamable_http::{StreamableHttpConfig, StreamableHttpTransport};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Which wire format a transport speaks, for logging/diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Newline-delimited JSON over stdin/stdout
    Stdio,
    /// HTTP + Server-Sent Events
    Sse,
    /// HTTP with a WebSocket upgrade
    StreamableHttp,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Stdio => "stdio",
            Self::Sse => "sse",
            Self::StreamableHttp => "streamable-http",
        };
        write!(f, "{s}")
    }
}

/// A listening MCP endpoint.
///
/// `listen` runs until `shutdown` fires or the transport hits a fatal I/O
/// error. It owns no dispatch logic of its own, only framing, session
/// resolution, and outbound delivery — the actual method catalog lives in
/// the dispatcher every transport is constructed with.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Which wire format this transport speaks.
    fn kind(&self) -> TransportKind;

    /// Run the transport's accept/read loop until `shutdown` is cancelled.
    async fn listen(&self, shutdown: CancellationToken) -> Result<()>;

    /// Release resources held beyond what `listen` returning already frees
    /// (spec §4.4 `Close(ctx)`: "drain in-flight, release resources").
    /// Called by [`crate::server::McpServer::stop`] once `listen` has
    /// returned. The default no-op suits transports with no standing
    /// connection table of their own; `SseTransport`/`StreamableHttpTransport`
    /// override it to drop their per-session mailboxes.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
