//! Session manager (spec §3 Session, §4.3, §5)
//!
//! Sessions are the per-connection identity and state bag every handler
//! reaches through the call context. The store is in-memory only — spec §1
//! scopes persistence out — but is expressed behind a trait so a backend
//! could later be swapped in without breaking the dispatcher or transports
//! (the same "opaque, swappable backend" reasoning spec §9 applies to
//! cursors).

mod context;
mod error;
mod outbound;
mod session;
mod store;

pub use context::RequestContext;
pub use error::SessionError;
pub use outbound::Outbound;
pub use session::Session;
pub use store::{InMemorySessionStore, SessionStore};

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
