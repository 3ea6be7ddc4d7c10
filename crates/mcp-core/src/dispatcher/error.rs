//! Dispatcher-level errors and their JSON-RPC error codes.

use thiserror::Error;

use crate::protocol::ErrorCode;

/// An error produced while routing or handling one JSON-RPC request.
///
/// Generalized from `clawde-io-apps`'s `McpDispatcher::classify_error`
/// (string-prefix sentinels mapped to a code) into a typed enum with a
/// `const fn error_code`, matching the shape of the teacher's
/// `ServerError::error_code` instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// `jsonrpc` field wasn't `"2.0"`, or the frame was structurally invalid
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No handler registered for this method name
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// Params failed to decode against the method's expected shape
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// A request other than `initialize` arrived before `initialize` succeeded
    #[error("server not initialized")]
    NotInitialized,

    /// `tools/call` named a tool no provider has
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// `prompts/get` named a prompt no provider has
    #[error("prompt not found: {0}")]
    PromptNotFound(String),

    /// `resources/read` or `resources/subscribe` named a resource no provider has
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// Method recognized but the callee declined to support it (e.g. a
    /// resource that doesn't support subscription)
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// An internal failure the caller can't act on
    #[error("internal error: {0}")]
    Internal(String),

    /// Result/params serialization failed
    #[error("internal error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DispatchError {
    /// The JSON-RPC error code this error maps to (spec §3, §7).
    #[must_use]
    pub const fn error_code(&self) -> i32 {
        match self {
            Self::InvalidRequest(_) => ErrorCode::InvalidRequest.as_i32(),
            Self::MethodNotFound(_) => ErrorCode::MethodNotFound.as_i32(),
            Self::InvalidParams(_) => ErrorCode::InvalidParams.as_i32(),
            Self::NotInitialized => ErrorCode::NotInitialized.as_i32(),
            Self::ToolNotFound(_) => ErrorCode::ToolNotFound.as_i32(),
            Self::PromptNotFound(_) => ErrorCode::PromptNotFound.as_i32(),
            Self::ResourceNotFound(_) => ErrorCode::ResourceNotFound.as_i32(),
            Self::NotImplemented(_) => ErrorCode::NotImplemented.as_i32(),
            Self::Internal(_) | Self::Json(_) => ErrorCode::InternalError.as_i32(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_never_surface_method_not_found() {
        assert_ne!(DispatchError::ToolNotFound("x".into()).error_code(), ErrorCode::MethodNotFound.as_i32());
        assert_ne!(DispatchError::PromptNotFound("x".into()).error_code(), ErrorCode::MethodNotFound.as_i32());
        assert_ne!(DispatchError::ResourceNotFound("x".into()).error_code(), ErrorCode::MethodNotFound.as_i32());
    }
}
