//! Per-request context: the session plus the request's cancellation token.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::outbound::Outbound;
use super::session::Session;
use crate::protocol::{Id, JsonRpcNotification};

/// Carries everything a handler needs beyond its own arguments: the
/// resolved session (spec §4.3 "Context propagation") and a token that
/// fires when the request is cancelled (spec §4.1 "Cancellation", §5).
///
/// Every dispatch path attaches a session before invoking a handler, so
/// unlike the source design (which allows "absence of a session in context"
/// and panics on it in debug builds) this crate makes that state
/// unrepresentable: a `RequestContext` simply cannot exist without a
/// session. See DESIGN.md for this Open Question's resolution.
#[derive(Clone)]
pub struct RequestContext {
    session: Arc<Session>,
    cancellation: CancellationToken,
    request_id: Option<Id>,
    outbound: Option<Arc<dyn Outbound>>,
}

impl RequestContext {
    /// Build a context for a freshly dispatched request or notification.
    /// `emit_progress` is a no-op until [`Self::for_request`] attaches a
    /// request id and an outbound sink.
    #[must_use]
    pub fn new(session: Arc<Session>, cancellation: CancellationToken) -> Self {
        Self {
            session,
            cancellation,
            request_id: None,
            outbound: None,
        }
    }

    /// Build a context for a request whose handler may emit
    /// `notifications/progress` (spec §4.1 "Progress").
    #[must_use]
    pub fn for_request(
        session: Arc<Session>,
        cancellation: CancellationToken,
        request_id: Id,
        outbound: Arc<dyn Outbound>,
    ) -> Self {
        Self {
            session,
            cancellation,
            request_id: Some(request_id),
            outbound: Some(outbound),
        }
    }

    /// The session this request belongs to.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The cancellation token for this specific request.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Whether this request has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Resolve once this request is cancelled. Handlers should race this
    /// against their blocking points (spec §5 "Handler code MUST honor
    /// context cancellation at every blocking point").
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }

    /// Emit a `notifications/progress` for this request. A no-op for
    /// contexts built via [`Self::new`] (notifications, or transports that
    /// don't wire up an outbound sink).
    pub async fn emit_progress(&self, progress: Value, total: Option<Value>) {
        let (Some(request_id), Some(outbound)) = (&self.request_id, &self.outbound) else {
            return;
        };
        let mut payload = serde_json::json!({
            "requestId": request_id,
            "progress": progress,
        });
        if let Some(total) = total {
            payload["total"] = total;
        }
        let notification = JsonRpcNotification::new("notifications/progress", payload);
        if let Ok(encoded) = serde_json::to_value(&notification) {
            outbound.send(self.session.id(), encoded).await;
        }
    }
}
