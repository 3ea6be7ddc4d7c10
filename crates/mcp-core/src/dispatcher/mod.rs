//! The protocol dispatcher (spec §4.1): routes JSON-RPC requests and
//! notifications to the provider/session layer and assembles responses.
//!
//! Generalizes the teacher's `McpServer::handle_request` match statement
//! (four methods: `initialize`, `initialized`, `tools/list`, `tools/call`)
//! to the full method catalog, the initialize-first gate, batch dispatch
//! with ordered responses and notification suppression, and the inflight
//! cancellation registry.

mod error;
mod inflight;

pub use error::DispatchError;
pub use inflight::InflightRegistry;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::protocol::{
    parse_frame, GetPromptParams, IncomingFrame, InitializeParams, InitializeResult,
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, ListPromptsParams,
    ListPromptsResult, ListResourceTemplatesResult, ListResourcesParams, ListResourcesResult,
    ListToolsParams, ListToolsResult, LoggingCapability, PromptsCapability, ReadResourceParams,
    ResourcesCapability, ServerCapabilities, ServerInfo, SubscribeResourceParams, ToolCallParams,
    ToolCallResult, ToolsCapability, PROTOCOL_VERSIONS,
};
use crate::registry::{PromptProvider, ResourceProvider, ToolProvider, DEFAULT_PAGE_SIZE};
use crate::session::{Outbound, RequestContext, Session, SessionStore};

/// Everything a dispatcher needs beyond the provider set, fixed at
/// construction time and echoed in `initialize` results.
pub struct ServerIdentity {
    /// Server name reported in `initialize`
    pub name: String,
    /// Server version reported in `initialize`
    pub version: String,
}

/// Routes parsed JSON-RPC frames to the provider/session layer.
///
/// One `Dispatcher` is shared (via `Arc`) across every transport a server
/// runs; dispatch itself holds no per-connection state beyond the inflight
/// registry and the resource-subscription table, both keyed by session id.
pub struct Dispatcher {
    tools: Arc<dyn ToolProvider>,
    prompts: Arc<dyn PromptProvider>,
    resources: Arc<dyn ResourceProvider>,
    sessions: Arc<dyn SessionStore>,
    identity: ServerIdentity,
    inflight: InflightRegistry,
    subscriptions: RwLock<HashMap<(String, String), crate::registry::SubscriptionHandle>>,
}

impl Dispatcher {
    /// Build a dispatcher over a fixed set of providers.
    #[must_use]
    pub fn new(
        tools: Arc<dyn ToolProvider>,
        prompts: Arc<dyn PromptProvider>,
        resources: Arc<dyn ResourceProvider>,
        sessions: Arc<dyn SessionStore>,
        identity: ServerIdentity,
    ) -> Self {
        Self {
            tools,
            prompts,
            resources,
            sessions,
            identity,
            inflight: InflightRegistry::new(),
            subscriptions: RwLock::new(HashMap::new()),
        }
    }

    /// The session store this dispatcher's transports should share.
    #[must_use]
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Cancel every request currently in flight (spec §4.5 shutdown step 2).
    /// Used by [`crate::server::McpServer::stop`]; handlers observe this
    /// through their [`RequestContext`]'s cancellation token same as a
    /// targeted `notifications/cancelled`.
    pub async fn cancel_all_inflight(&self) {
        self.inflight.cancel_all().await;
    }

    /// Dispatch one transport frame (an NDJSON line, an HTTP body, a WS text
    /// frame) for `session`, returning the encoded response frame to send
    /// back — `None` when the frame was entirely notifications (spec §8
    /// property 4 "notification silence") or every response in a batch was
    /// suppressed by cancellation.
    pub async fn dispatch_frame(
        &self,
        raw: &str,
        session: &Arc<Session>,
        outbound: &Arc<dyn Outbound>,
    ) -> Option<String> {
        session.touch().await;

        let frame = match parse_frame(raw) {
            Ok(frame) => frame,
            Err(code) => {
                let response = JsonRpcResponse::error(Value::Null, code.as_i32(), code.default_message());
                return serde_json::to_string(&response).ok();
            }
        };

        match frame {
            IncomingFrame::Single(msg) => {
                let response = self.dispatch_message(msg, session, outbound).await?;
                serde_json::to_string(&response).ok()
            }
            IncomingFrame::Batch(batch) => {
                let mut responses = Vec::new();
                for msg in batch {
                    if let Some(response) = self.dispatch_message(msg, session, outbound).await {
                        responses.push(response);
                    }
                }
                if responses.is_empty() {
                    None
                } else {
                    serde_json::to_string(&responses).ok()
                }
            }
        }
    }

    async fn dispatch_message(
        &self,
        msg: JsonRpcMessage,
        session: &Arc<Session>,
        outbound: &Arc<dyn Outbound>,
    ) -> Option<JsonRpcResponse> {
        match msg {
            JsonRpcMessage::Notification(note) => {
                self.handle_notification(note, session).await;
                None
            }
            JsonRpcMessage::Request(req) => self.dispatch_request(req, session, outbound).await,
        }
    }

    async fn dispatch_request(
        &self,
        req: JsonRpcRequest,
        session: &Arc<Session>,
        outbound: &Arc<dyn Outbound>,
    ) -> Option<JsonRpcResponse> {
        let id_value = serde_json::to_value(&req.id).unwrap_or(Value::Null);

        if req.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                id_value,
                crate::protocol::ErrorCode::InvalidRequest.as_i32(),
                "jsonrpc must be \"2.0\"",
            ));
        }

        let token = self.inflight.register(&req.id).await;
        let ctx = RequestContext::for_request(Arc::clone(session), token, req.id.clone(), Arc::clone(outbound));

        let result = self.route(&req.method, req.params, session, &ctx, outbound).await;
        self.inflight.clear(&req.id).await;

        // §4.1 "the response for a cancelled request, if not yet sent, is
        // suppressed" — by the time the handler returns there's nothing left
        // to send it to, so treat a cancelled context as "no response".
        if ctx.is_cancelled() {
            debug!(request_id = %req.id, "suppressing response for cancelled request");
            return None;
        }

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id_value, value),
            Err(err) => JsonRpcResponse::error(id_value, err.error_code(), err.to_string()),
        })
    }

    async fn handle_notification(&self, note: JsonRpcNotification, session: &Arc<Session>) {
        match note.method.as_str() {
            "notifications/cancelled" => {
                let Some(request_id) = cancellation_target(&note.params) else {
                    debug!("notifications/cancelled missing or malformed requestId");
                    return;
                };
                if !self.inflight.cancel(&request_id).await {
                    debug!(request_id, "cancellation of unknown or already-completed request");
                }
            }
            "notifications/initialized" | "initialized" => {
                session.touch().await;
            }
            other => {
                debug!(method = other, "unhandled notification");
            }
        }
    }

    async fn route(
        &self,
        method: &str,
        params: Value,
        session: &Arc<Session>,
        ctx: &RequestContext,
        outbound: &Arc<dyn Outbound>,
    ) -> Result<Value, DispatchError> {
        if method != "initialize" && !session.is_initialized().await {
            return Err(DispatchError::NotInitialized);
        }

        match method {
            "initialize" => self.handle_initialize(params, session).await,
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => self.handle_tools_list(params).await,
            "tools/call" => self.handle_tools_call(params, ctx).await,
            "prompts/list" => self.handle_prompts_list(params).await,
            "prompts/get" => self.handle_prompts_get(params, ctx).await,
            "resources/list" => self.handle_resources_list(params).await,
            "resources/templates/list" => Ok(serde_json::to_value(ListResourceTemplatesResult::default())?),
            "resources/read" => self.handle_resources_read(params, ctx).await,
            "resources/subscribe" => self.handle_resources_subscribe(params, ctx, outbound).await,
            "resources/unsubscribe" => self.handle_resources_unsubscribe(params, ctx).await,
            "logging/setLevel" => self.handle_logging_set_level(params, session).await,
            other => Err(DispatchError::MethodNotFound(other.to_string())),
        }
    }

    async fn handle_initialize(&self, params: Value, session: &Arc<Session>) -> Result<Value, DispatchError> {
        let init: InitializeParams =
            serde_json::from_value(params).map_err(|e| DispatchError::InvalidParams(e.to_string()))?;

        if !PROTOCOL_VERSIONS.contains(&init.protocol_version.as_str()) {
            return Err(DispatchError::InvalidParams(format!(
                "unsupported protocol version: {}",
                init.protocol_version
            )));
        }

        session.mark_initialized().await;

        let result = InitializeResult {
            protocol_version: init.protocol_version,
            server_info: ServerInfo {
                name: self.identity.name.clone(),
                version: self.identity.version.clone(),
            },
            capabilities: self.capabilities(),
        };
        Ok(serde_json::to_value(result)?)
    }

    fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            tools: ToolsCapability { list_changed: false },
            prompts: PromptsCapability { list_changed: false },
            resources: ResourcesCapability {
                subscribe: true,
                list_changed: false,
            },
            logging: LoggingCapability {},
        }
    }

    async fn handle_tools_list(&self, params: Value) -> Result<Value, DispatchError> {
        let p: ListToolsParams =
            serde_json::from_value(params).map_err(|e| DispatchError::InvalidParams(e.to_string()))?;
        let (tools, next_cursor) = self.tools.list(&p.cursor, DEFAULT_PAGE_SIZE).await;
        Ok(serde_json::to_value(ListToolsResult { tools, next_cursor })?)
    }

    async fn handle_tools_call(&self, params: Value, ctx: &RequestContext) -> Result<Value, DispatchError> {
        let p: ToolCallParams =
            serde_json::from_value(params).map_err(|e| DispatchError::InvalidParams(e.to_string()))?;

        let tools = Arc::clone(&self.tools);
        let name = p.name.clone();
        let args = p.arguments;
        let task_ctx = ctx.clone();
        let outcome = tokio::spawn(async move { tools.call(&name, args, &task_ctx).await }).await;

        match outcome {
            Ok(Ok(result)) => Ok(serde_json::to_value(result)?),
            Ok(Err(e)) if e.is_not_found() => Err(DispatchError::ToolNotFound(p.name)),
            // Tool-semantic failures surface as a successful response whose
            // result carries `isError: true`, not a JSON-RPC error (spec §7
            // "tool-semantic failures ⇒ ToolResult").
            Ok(Err(e)) => Ok(serde_json::to_value(ToolCallResult::failure(e.to_string()))?),
            // A handler panic is a bug, not a tool-semantic failure (spec §7
            // "panics/bugs ⇒ -32603"); the spawned task isolates it so it
            // can't take down the dispatcher's own task.
            Err(join_err) => {
                tracing::error!(tool = %p.name, error = %join_err, "tool handler panicked");
                Err(DispatchError::Internal(format!("tool handler panicked: {join_err}")))
            }
        }
    }

    async fn handle_prompts_list(&self, params: Value) -> Result<Value, DispatchError> {
        let p: ListPromptsParams =
            serde_json::from_value(params).map_err(|e| DispatchError::InvalidParams(e.to_string()))?;
        let (prompts, next_cursor) = self.prompts.list(&p.cursor, DEFAULT_PAGE_SIZE).await;
        Ok(serde_json::to_value(ListPromptsResult { prompts, next_cursor })?)
    }

    async fn handle_prompts_get(&self, params: Value, ctx: &RequestContext) -> Result<Value, DispatchError> {
        let p: GetPromptParams =
            serde_json::from_value(params).map_err(|e| DispatchError::InvalidParams(e.to_string()))?;

        let prompts = Arc::clone(&self.prompts);
        let name = p.name.clone();
        let args = p.arguments.clone();
        let task_ctx = ctx.clone();
        let outcome = tokio::spawn(async move { prompts.get(&name, &args, &task_ctx).await }).await;

        match outcome {
            Ok(Ok(result)) => Ok(serde_json::to_value(result)?),
            Ok(Err(e)) if e.is_not_found() => Err(DispatchError::PromptNotFound(p.name)),
            Ok(Err(e)) => Err(DispatchError::Internal(e.to_string())),
            Err(join_err) => {
                tracing::error!(prompt = %p.name, error = %join_err, "prompt handler panicked");
                Err(DispatchError::Internal(format!("prompt handler panicked: {join_err}")))
            }
        }
    }

    async fn handle_resources_list(&self, params: Value) -> Result<Value, DispatchError> {
        let p: ListResourcesParams =
            serde_json::from_value(params).map_err(|e| DispatchError::InvalidParams(e.to_string()))?;
        let (resources, next_cursor) = self.resources.list(&p.cursor, DEFAULT_PAGE_SIZE).await;
        Ok(serde_json::to_value(ListResourcesResult { resources, next_cursor })?)
    }

    async fn handle_resources_read(&self, params: Value, ctx: &RequestContext) -> Result<Value, DispatchError> {
        let p: ReadResourceParams =
            serde_json::from_value(params).map_err(|e| DispatchError::InvalidParams(e.to_string()))?;

        let resources = Arc::clone(&self.resources);
        let uri = p.uri.clone();
        let task_ctx = ctx.clone();
        let outcome = tokio::spawn(async move { resources.read(&uri, &task_ctx).await }).await;

        match outcome {
            Ok(Ok(result)) => Ok(serde_json::to_value(result)?),
            Ok(Err(e)) if e.is_not_found() => Err(DispatchError::ResourceNotFound(p.uri)),
            Ok(Err(e)) => Err(DispatchError::Internal(e.to_string())),
            Err(join_err) => {
                tracing::error!(uri = %p.uri, error = %join_err, "resource handler panicked");
                Err(DispatchError::Internal(format!("resource handler panicked: {join_err}")))
            }
        }
    }

    async fn handle_resources_subscribe(
        &self,
        params: Value,
        ctx: &RequestContext,
        outbound: &Arc<dyn Outbound>,
    ) -> Result<Value, DispatchError> {
        let p: SubscribeResourceParams =
            serde_json::from_value(params).map_err(|e| DispatchError::InvalidParams(e.to_string()))?;

        let (mut sink, handle) = match self.resources.subscribe(&p.uri).await {
            Ok(pair) => pair,
            Err(e) if e.is_not_found() => return Err(DispatchError::ResourceNotFound(p.uri)),
            Err(e) => return Err(DispatchError::NotImplemented(e.to_string())),
        };

        let session_id = ctx.session().id().to_string();
        self.subscriptions
            .write()
            .await
            .insert((session_id.clone(), p.uri.clone()), handle);

        let outbound = Arc::clone(outbound);
        tokio::spawn(async move {
            while let Some(update) = sink.recv().await {
                let notification = JsonRpcNotification::new(
                    "notifications/resources/updated",
                    serde_json::json!({ "uri": update.uri }),
                );
                if let Ok(encoded) = serde_json::to_value(&notification) {
                    outbound.send(&session_id, encoded).await;
                }
            }
        });

        Ok(serde_json::json!({}))
    }

    async fn handle_resources_unsubscribe(&self, params: Value, ctx: &RequestContext) -> Result<Value, DispatchError> {
        let p: SubscribeResourceParams =
            serde_json::from_value(params).map_err(|e| DispatchError::InvalidParams(e.to_string()))?;
        let key = (ctx.session().id().to_string(), p.uri);
        if let Some(handle) = self.subscriptions.write().await.remove(&key) {
            handle.cancel();
        }
        Ok(serde_json::json!({}))
    }

    async fn handle_logging_set_level(&self, params: Value, session: &Arc<Session>) -> Result<Value, DispatchError> {
        if let Some(level) = params.get("level").and_then(Value::as_str) {
            session.set_data("logging.level", Value::String(level.to_string())).await;
        }
        Ok(serde_json::json!({}))
    }
}

/// Pull a cancellation target out of a `notifications/cancelled` payload's
/// `requestId` field, preserving the string/number distinction the inflight
/// registry's keys were built with.
fn cancellation_target(params: &Value) -> Option<String> {
    match params.get("requestId")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{PromptRegistry, ResourceRegistry, ToolRegistry};
    use crate::session::InMemorySessionStore;
    use serde_json::json;

    struct NullOutbound;

    #[async_trait::async_trait]
    impl Outbound for NullOutbound {
        async fn send(&self, _session_id: &str, _message: Value) {}
    }

    async fn dispatcher() -> (Arc<Dispatcher>, Arc<Session>, Arc<dyn Outbound>) {
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let session = sessions.create().await;
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::new(ToolRegistry::new()),
            Arc::new(PromptRegistry::new()),
            Arc::new(ResourceRegistry::new()),
            sessions,
            ServerIdentity {
                name: "test-server".to_string(),
                version: "0.0.0".to_string(),
            },
        ));
        (dispatcher, session, Arc::new(NullOutbound))
    }

    async fn dispatcher_with_tools(tools: ToolRegistry) -> (Arc<Dispatcher>, Arc<Session>, Arc<dyn Outbound>) {
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let session = sessions.create().await;
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::new(tools),
            Arc::new(PromptRegistry::new()),
            Arc::new(ResourceRegistry::new()),
            sessions,
            ServerIdentity {
                name: "test-server".to_string(),
                version: "0.0.0".to_string(),
            },
        ));
        (dispatcher, session, Arc::new(NullOutbound))
    }

    #[tokio::test]
    async fn requests_before_initialize_are_rejected() {
        let (dispatcher, session, outbound) = dispatcher().await;
        let frame = r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#;
        let response = dispatcher.dispatch_frame(frame, &session, &outbound).await.unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"]["code"], -32002);
    }

    #[tokio::test]
    async fn initialize_then_ping_round_trips() {
        let (dispatcher, session, outbound) = dispatcher().await;
        let init = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#;
        let response = dispatcher.dispatch_frame(init, &session, &outbound).await.unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["result"]["protocolVersion"], "2024-11-05");

        let ping = r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#;
        let response = dispatcher.dispatch_frame(ping, &session, &outbound).await.unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["result"], json!({}));
    }

    #[tokio::test]
    async fn initialize_rejects_unsupported_protocol_version() {
        let (dispatcher, session, outbound) = dispatcher().await;
        let init = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"1999-01-01"}}"#;
        let response = dispatcher.dispatch_frame(init, &session, &outbound).await.unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn unknown_tool_surfaces_tool_not_found() {
        let (dispatcher, session, outbound) = dispatcher().await;
        session.mark_initialized().await;

        let call = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"missing","arguments":{}}}"#;
        let response = dispatcher.dispatch_frame(call, &session, &outbound).await.unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"]["code"], -32002);
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let (dispatcher, session, outbound) = dispatcher().await;
        session.mark_initialized().await;

        let call = r#"{"jsonrpc":"2.0","id":1,"method":"sorcery/cast"}"#;
        let response = dispatcher.dispatch_frame(call, &session, &outbound).await.unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn batch_with_only_notifications_produces_no_response() {
        let (dispatcher, session, outbound) = dispatcher().await;
        session.mark_initialized().await;

        let batch = r#"[{"jsonrpc":"2.0","method":"notifications/initialized"},{"jsonrpc":"2.0","method":"notifications/initialized"}]"#;
        let response = dispatcher.dispatch_frame(batch, &session, &outbound).await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn batch_mixing_requests_and_notifications_replies_only_to_requests() {
        let (dispatcher, session, outbound) = dispatcher().await;
        session.mark_initialized().await;

        let batch = r#"[
            {"jsonrpc":"2.0","id":1,"method":"ping"},
            {"jsonrpc":"2.0","method":"notifications/initialized"},
            {"jsonrpc":"2.0","id":2,"method":"ping"}
        ]"#;
        let response = dispatcher.dispatch_frame(batch, &session, &outbound).await.unwrap();
        let values: Vec<Value> = serde_json::from_str(&response).unwrap();
        assert_eq!(values.len(), 2);
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let (dispatcher, session, outbound) = dispatcher().await;
        let response = dispatcher.dispatch_frame("{not json}", &session, &outbound).await.unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn cancelled_request_produces_no_response() {
        let (dispatcher, session, outbound) = dispatcher().await;
        session.mark_initialized().await;

        // Cancel arrives before the request it targets; since `ping`
        // resolves synchronously there's no real race to win, so this
        // exercises `inflight.cancel` on an id that's already cleared
        // rather than true in-flight cancellation (covered by the
        // registry's own tests).
        let cancel = r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":1}}"#;
        dispatcher.dispatch_frame(cancel, &session, &outbound).await;

        let ping = r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#;
        let response = dispatcher.dispatch_frame(ping, &session, &outbound).await;
        assert!(response.is_some());
    }

    #[tokio::test]
    async fn resource_subscribe_on_unknown_uri_is_not_found() {
        let (dispatcher, session, outbound) = dispatcher().await;
        session.mark_initialized().await;

        let call = r#"{"jsonrpc":"2.0","id":1,"method":"resources/subscribe","params":{"uri":"file:///missing"}}"#;
        let response = dispatcher.dispatch_frame(call, &session, &outbound).await.unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"]["code"], -32001);
    }

    #[tokio::test]
    async fn resources_templates_list_is_always_an_empty_page() {
        let (dispatcher, session, outbound) = dispatcher().await;
        session.mark_initialized().await;

        let call = r#"{"jsonrpc":"2.0","id":1,"method":"resources/templates/list"}"#;
        let response = dispatcher.dispatch_frame(call, &session, &outbound).await.unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["result"]["resourceTemplates"], json!([]));
    }

    #[tokio::test]
    async fn panicking_tool_handler_surfaces_as_internal_error() {
        struct Boom;

        #[async_trait::async_trait]
        impl crate::registry::Tool for Boom {
            fn name(&self) -> &str {
                "boom"
            }

            fn description(&self) -> &str {
                "always panics"
            }

            fn input_schema(&self) -> Value {
                json!({"type": "object"})
            }

            async fn call(
                &self,
                _args: Value,
                _ctx: &RequestContext,
            ) -> Result<ToolCallResult, crate::registry::ProviderError> {
                panic!("boom")
            }
        }

        let tools = ToolRegistry::new();
        tools.register(Arc::new(Boom)).await;
        let (dispatcher, session, outbound) = dispatcher_with_tools(tools).await;
        session.mark_initialized().await;

        let call = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"boom","arguments":{}}}"#;
        let response = dispatcher.dispatch_frame(call, &session, &outbound).await.unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["error"]["code"], -32603);
    }
}
