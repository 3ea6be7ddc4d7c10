//! Streamable HTTP transport: a websocket upgrade for full-duplex delivery,
//! with a `POST /messages` fallback for clients that never upgrade (spec
//! §4.4).
//!
//! New relative to the teacher, which has no websocket transport at all.
//! Grounded on `clawde-io-apps`'s websocket accept loop (`tokio::select!`
//! racing inbound frames against an outbound mailbox) but re-expressed
//! with axum's own `extract::ws` upgrade, since the whole crate is already
//! an axum server via the SSE transport and a second websocket dependency
//! would be redundant.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::mailbox::Mailbox;
use super::{Result, Transport, TransportError, TransportKind};
use crate::dispatcher::Dispatcher;
use crate::session::Outbound;

const SESSION_COOKIE: &str = "mcp_session_id";

/// Streamable HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct StreamableHttpConfig {
    /// Port to listen on
    pub port: u16,
}

impl StreamableHttpConfig {
    /// Build a config for the given port.
    #[must_use]
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

struct SharedState {
    dispatcher: Arc<Dispatcher>,
    sockets: RwLock<HashMap<String, Arc<Mailbox>>>,
}

impl SharedState {
    async fn live_socket(&self, session_id: &str) -> Option<Arc<Mailbox>> {
        self.sockets.read().await.get(session_id).cloned()
    }
}

#[async_trait]
impl Outbound for SharedState {
    async fn send(&self, session_id: &str, message: Value) {
        let Ok(frame) = serde_json::to_string(&message) else {
            return;
        };
        if let Some(mailbox) = self.live_socket(session_id).await {
            mailbox.push(frame);
        }
    }
}

/// Streamable HTTP transport: a websocket upgrade plus a synchronous POST
/// fallback (spec §4.4).
pub struct StreamableHttpTransport {
    config: StreamableHttpConfig,
    state: Arc<SharedState>,
}

impl StreamableHttpTransport {
    /// Build a streamable-HTTP transport over `dispatcher`'s shared session
    /// store.
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>, config: StreamableHttpConfig) -> Self {
        Self {
            config,
            state: Arc::new(SharedState {
                dispatcher,
                sockets: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// The outbound sink this transport delivers server-initiated
    /// notifications through.
    #[must_use]
    pub fn outbound(&self) -> Arc<dyn Outbound> {
        Arc::clone(&self.state) as Arc<dyn Outbound>
    }
}

#[async_trait]
impl Transport for StreamableHttpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::StreamableHttp
    }

    async fn listen(&self, shutdown: CancellationToken) -> Result<()> {
        let app = Router::new()
            .route("/ws", get(handle_upgrade))
            .route("/messages", post(handle_post))
            .layer(DefaultBodyLimit::max(4 * 1024 * 1024))
            .with_state(Arc::clone(&self.state));

        let addr = format!("0.0.0.0:{}", self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::BindFailed(e.to_string()))?;

        info!(port = self.config.port, "streamable HTTP transport listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| TransportError::Io(std::io::Error::other(e.to_string())))?;

        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.state.sockets.write().await.clear();
        Ok(())
    }
}

#[derive(Deserialize, Default)]
struct SessionQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

async fn handle_upgrade(
    State(state): State<Arc<SharedState>>,
    jar: CookieJar,
    Query(query): Query<SessionQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let session_id = match query
        .session_id
        .or_else(|| jar.get(SESSION_COOKIE).map(|c| c.value().to_string()))
    {
        Some(id) if state.dispatcher.sessions().get(&id).await.is_some() => id,
        _ => state.dispatcher.sessions().create().await.id().to_string(),
    };

    let jar = jar.add(Cookie::new(SESSION_COOKIE, session_id.clone()));
    let response = ws.on_upgrade(move |socket| handle_socket(socket, state, session_id));
    (jar, response).into_response()
}

async fn handle_socket(mut socket: WebSocket, state: Arc<SharedState>, session_id: String) {
    let Some(session) = state.dispatcher.sessions().get(&session_id).await else {
        let _ = socket.send(Message::Close(None)).await;
        return;
    };

    let mailbox = Arc::new(Mailbox::new());
    state.sockets.write().await.insert(session_id.clone(), Arc::clone(&mailbox));

    let outbound: Arc<dyn Outbound> = Arc::clone(&state) as Arc<dyn Outbound>;
    let dispatcher = Arc::clone(&state.dispatcher);

    loop {
        tokio::select! {
            biased;

            frame = mailbox.recv() => {
                let Some(frame) = frame else { break };
                if socket.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }

            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = dispatcher.dispatch_frame(&text, &session, &outbound).await {
                            if socket.send(Message::Text(reply.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(err = %e, "websocket read error");
                        break;
                    }
                }
            }
        }
    }

    mailbox.close();
    state.sockets.write().await.remove(&session_id);
}

async fn handle_post(
    State(state): State<Arc<SharedState>>,
    jar: CookieJar,
    Query(query): Query<SessionQuery>,
    body: String,
) -> Response {
    let Some(session_id) = query
        .session_id
        .or_else(|| jar.get(SESSION_COOKIE).map(|c| c.value().to_string()))
    else {
        return (StatusCode::BAD_REQUEST, "missing sessionId").into_response();
    };

    let Some(session) = state.dispatcher.sessions().get(&session_id).await else {
        return (StatusCode::NOT_FOUND, "unknown session").into_response();
    };

    let outbound: Arc<dyn Outbound> = Arc::clone(&state) as Arc<dyn Outbound>;

    if let Some(mailbox) = state.live_socket(&session_id).await {
        let dispatcher = Arc::clone(&state.dispatcher);
        tokio::spawn(async move {
            if let Some(reply) = dispatcher.dispatch_frame(&body, &session, &outbound).await {
                mailbox.push(reply);
            }
        });
        return StatusCode::ACCEPTED.into_response();
    }

    match state.dispatcher.dispatch_frame(&body, &session, &outbound).await {
        Some(reply) => ([("content-type", "application/json")], reply).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
