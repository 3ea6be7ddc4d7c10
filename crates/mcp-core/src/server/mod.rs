//! The server orchestrator (spec §4.5): owns one transport, the session
//! store, and the registries, and drives the startup/shutdown sequence.
//!
//! New relative to the teacher, whose `main.rs` inlines construction of a
//! single `McpServer` with no orchestration layer of its own. Shutdown
//! ordering is grounded on `clawde-io-apps`'s `tokio::select!`
//! signal-driven shutdown (`make_shutdown_future`/`run`).

mod config;

pub use config::{ServerConfig, TransportSelection};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::dispatcher::{Dispatcher, ServerIdentity};
use crate::registry::{PromptProvider, ResourceProvider, ToolProvider};
use crate::session::{InMemorySessionStore, SessionStore};
use crate::transport::{
    SseConfig, SseTransport, StdioTransport, StreamableHttpConfig, StreamableHttpTransport,
    Transport, TransportError,
};

/// Default bound on shutdown step 3, "drain outbound queues with the
/// shutdown deadline" (spec §4.5, §7).
pub const DEFAULT_SHUTDOWN_DEADLINE: Duration = Duration::from_secs(30);

/// Owns the dispatcher and the single transport a process runs.
///
/// Spec §4.4 allows a server to run more than one transport concurrently
/// against the same dispatcher; [`Self::dispatcher`] exposes the shared
/// `Arc<Dispatcher>` so a caller can build additional transports over it
/// by hand and run them alongside [`Self::run`].
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
    transport: Arc<dyn Transport>,
    shutdown: CancellationToken,
    drained: watch::Sender<bool>,
}

impl McpServer {
    /// Build a server from a fixed provider set and configuration.
    #[must_use]
    pub fn new(
        tools: Arc<dyn ToolProvider>,
        prompts: Arc<dyn PromptProvider>,
        resources: Arc<dyn ResourceProvider>,
        config: ServerConfig,
    ) -> Self {
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let dispatcher = Arc::new(Dispatcher::new(
            tools,
            prompts,
            resources,
            sessions,
            ServerIdentity {
                name: config.name,
                version: config.version,
            },
        ));

        let transport: Arc<dyn Transport> = match config.transport {
            TransportSelection::Stdio => Arc::new(StdioTransport::new(Arc::clone(&dispatcher))),
            TransportSelection::Sse { port } => {
                Arc::new(SseTransport::new(Arc::clone(&dispatcher), SseConfig::new(port)))
            }
            TransportSelection::StreamableHttp { port } => Arc::new(StreamableHttpTransport::new(
                Arc::clone(&dispatcher),
                StreamableHttpConfig::new(port),
            )),
        };

        let (drained, _) = watch::channel(false);

        Self {
            dispatcher,
            transport,
            shutdown: CancellationToken::new(),
            drained,
        }
    }

    /// Run the transport's accept/read loop until [`Self::stop`] is called
    /// or the transport hits a fatal I/O error.
    ///
    /// # Errors
    ///
    /// Propagates a fatal transport I/O error (e.g. failed to bind).
    pub async fn run(&self) -> Result<(), TransportError> {
        info!(transport = %self.transport.kind(), "starting MCP server");
        let result = self.transport.listen(self.shutdown.clone()).await;
        info!("transport stopped");
        // Wake anything blocked in `stop`'s drain step even if nothing
        // ever called `stop` (e.g. the transport exited on its own).
        let _ = self.drained.send(true);
        result
    }

    /// Shut the server down in the five-step order spec §4.5 mandates:
    ///
    /// 1. Reject new sessions/requests at transport ingress — cancelling
    ///    `shutdown` stops every transport's accept/read loop from picking
    ///    up new connections or lines.
    /// 2. Cancel all in-flight request contexts.
    /// 3. Drain outbound queues, bounded by `deadline` (spec: "calls
    ///    `Close` with a deadline, default 30s" — here, wait for `run`'s
    ///    `listen` call to actually return).
    /// 4. Release the session store.
    /// 5. Release transport resources ([`Transport::close`]).
    ///
    /// Safe to call before [`Self::run`] or concurrently with it from
    /// another task (e.g. a signal handler); calling it more than once is
    /// also safe; later calls shut down against the state earlier ones
    /// already advanced.
    ///
    /// # Errors
    ///
    /// Returns the first non-`Ok` result encountered: a step-3 timeout
    /// becomes a logged warning, not an error, since draining is
    /// best-effort; the first hard error only ever comes out of
    /// [`Transport::close`].
    pub async fn stop(&self, deadline: Duration) -> Result<(), TransportError> {
        let mut drained = self.drained.subscribe();

        self.shutdown.cancel();
        self.dispatcher.cancel_all_inflight().await;

        if tokio::time::timeout(deadline, drained.wait_for(|done| *done)).await.is_err() {
            warn!(?deadline, "shutdown deadline elapsed before the transport finished draining");
        }

        self.dispatcher.sessions().clear().await;
        self.transport.close().await
    }

    /// The shared dispatcher this server's transport was built over.
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}
