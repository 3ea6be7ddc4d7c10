//! The inflight cancellation registry (spec §4.1 "Cancellation", §5, §8
//! property 8): maps a request id to the cancel function for that request,
//! populated at entry and cleared at exit.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::protocol::Id;

/// Tracks one [`CancellationToken`] per in-flight request.
#[derive(Default)]
pub struct InflightRegistry {
    tokens: RwLock<HashMap<String, CancellationToken>>,
}

impl InflightRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh token for `id`, returning it for the handler to
    /// carry in its [`crate::session::RequestContext`].
    pub async fn register(&self, id: &Id) -> CancellationToken {
        let token = CancellationToken::new();
        self.tokens.write().await.insert(id.to_string(), token.clone());
        token
    }

    /// Clear bookkeeping for `id` once its handler has returned.
    pub async fn clear(&self, id: &Id) {
        self.tokens.write().await.remove(&id.to_string());
    }

    /// Cancel the request named by a raw id string (as carried in a
    /// `notifications/cancelled` payload). Returns `true` if a matching
    /// in-flight request was found and cancelled; cancelling an unknown id
    /// is a no-op (spec §4.1 "a no-op with a debug log").
    pub async fn cancel(&self, id: &str) -> bool {
        match self.tokens.write().await.remove(id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every currently in-flight request (spec §4.5 shutdown step 2:
    /// "cancel all in-flight request contexts"). Bookkeeping is left for
    /// each request's own `clear` call to remove as its handler observes
    /// the cancellation and returns.
    pub async fn cancel_all(&self) {
        for token in self.tokens.read().await.values() {
            token.cancel();
        }
    }
}
