//! Session store contract and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::SessionError;
use super::session::Session;

/// Storage backend for sessions.
///
/// The in-memory implementation is the only one this crate ships (spec §1
/// scopes persistence out), but handlers and transports only ever depend
/// on this trait, so a durable backend can be swapped in later.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Look up a session by id.
    async fn get(&self, id: &str) -> Option<Arc<Session>>;

    /// Create and register a brand new session.
    async fn create(&self) -> Arc<Session>;

    /// Remove a session. A no-op (not an error) if it doesn't exist.
    async fn delete(&self, id: &str);

    /// Drop every tracked session (spec §4.5 shutdown step 4: "release the
    /// session store"). Since this store is in-memory and scoped to the
    /// process, releasing it just means forgetting every session it holds.
    async fn clear(&self);

    /// Number of sessions currently tracked.
    async fn len(&self) -> usize;

    /// Whether the store currently tracks no sessions.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Look up a session, returning [`SessionError::NotFound`] if absent.
    async fn require(&self, id: &str) -> Result<Arc<Session>, SessionError> {
        self.get(id)
            .await
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }
}

/// Default in-memory [`SessionStore`].
///
/// A single `RwLock` guards the whole map (spec §5: "Session store
/// (in-memory): single RW lock"); per-session state has its own lock
/// (see [`Session`]), so reading/writing one session's state never blocks
/// lookups of another session.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl InMemorySessionStore {
    /// Create a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(id).cloned()
    }

    async fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::new());
        self.sessions
            .write()
            .await
            .insert(session.id().to_string(), Arc::clone(&session));
        session
    }

    async fn delete(&self, id: &str) {
        self.sessions.write().await.remove(id);
    }

    async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
