//! Server-initiated delivery back to a session.
//!
//! Transports implement this so [`super::context::RequestContext`] can push
//! progress notifications, and the dispatcher can push resource-update
//! notifications, without either of them knowing which transport a session
//! is attached to.

use async_trait::async_trait;
use serde_json::Value;

/// Delivers a server-initiated JSON-RPC notification to a session.
#[async_trait]
pub trait Outbound: Send + Sync {
    /// Send `message` (an already-encoded `JsonRpcNotification`) to every
    /// connection attached to `session_id`. Implementations must not block
    /// the caller on a slow or absent peer (spec §5 "A full mailbox causes
    /// the oldest message to be dropped... never blocks the dispatcher").
    async fn send(&self, session_id: &str, message: Value);
}
