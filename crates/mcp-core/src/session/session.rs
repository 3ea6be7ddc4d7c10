//! The `Session` type: identity plus a per-session state bag.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A logical client identity scoped to one transport connection (stdio/ws)
/// or one cookie (SSE).
///
/// State mutations are serialized per session via an internal `RwLock`
/// (spec §5: "Session state map: per-session RW lock"), so concurrent
/// `SetData`/`GetData` calls on the same session never race, while calls on
/// different sessions never contend with each other.
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    last_seen: RwLock<DateTime<Utc>>,
    state: RwLock<HashMap<String, Value>>,
    initialized: RwLock<bool>,
}

impl Session {
    /// Create a new session with a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            last_seen: RwLock::new(now),
            state: RwLock::new(HashMap::new()),
            initialized: RwLock::new(false),
        }
    }

    /// The session's unique id, stable for the store's lifetime.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When the session was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the session was last touched (any dispatch, not just mutation).
    pub async fn last_seen(&self) -> DateTime<Utc> {
        *self.last_seen.read().await
    }

    /// Mark the session as touched now.
    pub async fn touch(&self) {
        *self.last_seen.write().await = Utc::now();
    }

    /// Whether `initialize` has completed on this session.
    pub async fn is_initialized(&self) -> bool {
        *self.initialized.read().await
    }

    /// Mark the session as initialized.
    ///
    /// Spec §9 Open Questions: re-initialization across reconnects on the
    /// same cookie is permitted and resets negotiated capabilities, but
    /// retains subscriptions — so this only ever flips the flag, never
    /// touches `state`.
    pub async fn mark_initialized(&self) {
        *self.initialized.write().await = true;
    }

    /// Read a value from the session's state bag.
    pub async fn get_data(&self, key: &str) -> Option<Value> {
        self.state.read().await.get(key).cloned()
    }

    /// Write a value into the session's state bag.
    pub async fn set_data(&self, key: impl Into<String>, value: Value) {
        self.state.write().await.insert(key.into(), value);
    }

    /// Remove a value from the session's state bag.
    pub async fn delete_data(&self, key: &str) -> Option<Value> {
        self.state.write().await.remove(key)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
