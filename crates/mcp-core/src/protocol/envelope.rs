//! JSON-RPC 2.0 envelope types: requests, notifications, responses, batches.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::ErrorCode;

/// JSON-RPC request/response identifier.
///
/// Requests carry either a string or an integer id (never null — see
/// spec §3 "Identifier"). The dispatcher treats ids as opaque and echoes
/// them back verbatim, so no numeric normalization happens here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// String identifier
    String(String),
    /// Integer identifier
    Number(i64),
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// JSON-RPC request — carries an `id` and expects a paired response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version, always `"2.0"`
    pub jsonrpc: String,
    /// Request identifier, echoed verbatim in the response
    pub id: Id,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    /// Build a request directly (mainly for tests and in-process dispatch).
    #[must_use]
    pub fn new(id: Id, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC notification — no `id`, never produces a response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JsonRpcNotification {
    /// JSON-RPC version, always `"2.0"`
    pub jsonrpc: String,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcNotification {
    /// Build a notification directly (mainly for server-initiated pushes).
    #[must_use]
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
        }
    }
}

/// A single incoming JSON-RPC message: request or notification.
///
/// Distinguished purely by presence of the `id` key, per spec §3.
#[derive(Debug, Clone)]
pub enum JsonRpcMessage {
    /// A request expecting a response
    Request(JsonRpcRequest),
    /// A notification with no response
    Notification(JsonRpcNotification),
}

impl JsonRpcMessage {
    /// The method name, regardless of message kind.
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::Request(r) => &r.method,
            Self::Notification(n) => &n.method,
        }
    }

    /// The request id, if this is a request.
    #[must_use]
    pub const fn id(&self) -> Option<&Id> {
        match self {
            Self::Request(r) => Some(&r.id),
            Self::Notification(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for JsonRpcMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.get("id").is_some() {
            serde_json::from_value(value)
                .map(Self::Request)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(Self::Notification)
                .map_err(D::Error::custom)
        }
    }
}

/// JSON-RPC response — paired with exactly one request.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version, always `"2.0"`
    pub jsonrpc: &'static str,
    /// Echoed request id
    pub id: Value,
    /// Result, mutually exclusive with `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error, mutually exclusive with `result`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Build a success response.
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response.
    #[must_use]
    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Build an error response carrying extra developer-facing detail.
    #[must_use]
    pub fn error_with_data(id: Value, code: i32, message: impl Into<String>, data: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: Some(data),
            }),
        }
    }
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code (see [`ErrorCode`])
    pub code: i32,
    /// Human-readable, display-safe message
    pub message: String,
    /// Optional developer-facing detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Build an error object from a reserved [`ErrorCode`].
    #[must_use]
    pub fn from_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_i32(),
            message: message.into(),
            data: None,
        }
    }
}

/// A decoded batch: an ordered, non-empty list of requests/notifications.
pub type JsonRpcBatch = Vec<JsonRpcMessage>;

/// Either a single message or a batch, as delivered by a transport frame.
#[derive(Debug, Clone)]
pub enum IncomingFrame {
    /// A single request or notification
    Single(JsonRpcMessage),
    /// A batch of requests/notifications
    Batch(JsonRpcBatch),
}

/// Parse one transport frame (a line of NDJSON, an HTTP body, a WS text
/// frame) into a single message or a batch.
///
/// Per spec §3, an empty batch array is invalid (callers should map the
/// returned [`ErrorCode::InvalidRequest`] to a single error response with a
/// `null` id).
pub fn parse_frame(raw: &str) -> Result<IncomingFrame, ErrorCode> {
    let value: Value = serde_json::from_str(raw).map_err(|_| ErrorCode::ParseError)?;
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                return Err(ErrorCode::InvalidRequest);
            }
            let mut batch = Vec::with_capacity(items.len());
            for item in items {
                let msg: JsonRpcMessage =
                    serde_json::from_value(item).map_err(|_| ErrorCode::InvalidRequest)?;
                batch.push(msg);
            }
            Ok(IncomingFrame::Batch(batch))
        }
        other => {
            let msg: JsonRpcMessage =
                serde_json::from_value(other).map_err(|_| ErrorCode::InvalidRequest)?;
            Ok(IncomingFrame::Single(msg))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_roundtrip_preserves_string_id() {
        let req = JsonRpcRequest::new(Id::String("abc".into()), "ping", json!({}));
        let encoded = serde_json::to_string(&req).unwrap();
        let decoded: JsonRpcRequest = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.id, Id::String("abc".into()));
        assert_eq!(decoded.method, "ping");
    }

    #[test]
    fn request_roundtrip_preserves_numeric_id() {
        let req = JsonRpcRequest::new(Id::Number(42), "ping", json!({}));
        let encoded = serde_json::to_string(&req).unwrap();
        let decoded: JsonRpcRequest = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.id, Id::Number(42));
    }

    #[test]
    fn parse_frame_distinguishes_request_from_notification() {
        let frame = parse_frame(r#"{"jsonrpc":"2.0","id":"1","method":"ping"}"#).unwrap();
        assert!(matches!(
            frame,
            IncomingFrame::Single(JsonRpcMessage::Request(_))
        ));

        let frame = parse_frame(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .unwrap();
        assert!(matches!(
            frame,
            IncomingFrame::Single(JsonRpcMessage::Notification(_))
        ));
    }

    #[test]
    fn parse_frame_rejects_empty_batch() {
        let err = parse_frame("[]").unwrap_err();
        assert_eq!(err, ErrorCode::InvalidRequest);
    }

    #[test]
    fn parse_frame_rejects_malformed_json() {
        let err = parse_frame("{not json}").unwrap_err();
        assert_eq!(err, ErrorCode::ParseError);
    }

    #[test]
    fn parse_frame_batch_preserves_order() {
        let frame = parse_frame(
            r#"[{"jsonrpc":"2.0","id":"a","method":"ping"},{"jsonrpc":"2.0","method":"notifications/initialized"},{"jsonrpc":"2.0","id":"b","method":"ping"}]"#,
        )
        .unwrap();
        let IncomingFrame::Batch(batch) = frame else {
            panic!("expected batch")
        };
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].method(), "ping");
        assert_eq!(batch[1].method(), "notifications/initialized");
    }
}
