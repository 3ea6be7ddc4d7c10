//! Server-level configuration (spec §4.5).
//!
//! Generalizes the teacher's `ServerConfig` (`server/types.rs`), which
//! carries browser configuration, into one that carries transport
//! selection instead of a concrete tool's settings.

/// Top-level server identity plus which transport to run.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name reported in `initialize`
    pub name: String,
    /// Server version reported in `initialize`
    pub version: String,
    /// Which transport to bind, and its transport-specific settings
    pub transport: TransportSelection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "mcp-core".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            transport: TransportSelection::Stdio,
        }
    }
}

/// Which transport a server should bind.
#[derive(Debug, Clone)]
pub enum TransportSelection {
    /// Newline-delimited JSON over stdin/stdout
    Stdio,
    /// HTTP + Server-Sent Events
    Sse {
        /// Port to listen on
        port: u16,
    },
    /// HTTP with a WebSocket upgrade
    StreamableHttp {
        /// Port to listen on
        port: u16,
    },
}
