//! # mcp-core
//!
//! A Model Context Protocol (MCP) server runtime: a JSON-RPC 2.0 protocol
//! engine, a session manager, a cursor-paginated tool/prompt/resource
//! registry, and three interchangeable transports (stdio, SSE, streamable
//! HTTP) that all share one dispatcher.
//!
//! ## Overview
//!
//! - [`protocol`]: the JSON-RPC envelope and the MCP method catalog —
//!   wire format only, no transport or dispatch opinions.
//! - [`registry`]: `Tool`/`Prompt`/`Resource` traits, kind-specific
//!   cursor-paginated registries, and an `Aggregator` that fans a method
//!   out across more than one provider.
//! - [`session`]: per-client `Session` state, a pluggable `SessionStore`,
//!   and the `RequestContext`/`Outbound` seam handlers use to read session
//!   state and push notifications.
//! - [`dispatcher`]: routes parsed frames to the provider/session layer,
//!   enforcing the initialize-first gate, batch semantics, and per-request
//!   cancellation.
//! - [`transport`]: stdio, SSE, and streamable-HTTP bindings over one
//!   shared `Dispatcher`.
//! - [`server`]: the orchestrator that wires a provider set and a
//!   transport selection into a runnable `McpServer`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mcp_core::registry::{PromptRegistry, ResourceRegistry, ToolRegistry};
//! use mcp_core::server::{McpServer, ServerConfig, TransportSelection};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = McpServer::new(
//!         Arc::new(ToolRegistry::new()),
//!         Arc::new(PromptRegistry::new()),
//!         Arc::new(ResourceRegistry::new()),
//!         ServerConfig {
//!             transport: TransportSelection::Stdio,
//!             ..ServerConfig::default()
//!         },
//!     );
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod dispatcher;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod transport;
