//! JSON-RPC 2.0 envelope and MCP method-catalog types
//!
//! This module owns the wire format only: request/response/notification
//! envelopes, the reserved error codes, and the typed payloads for every
//! method in the MCP catalog. It has no opinion on transport or dispatch.

mod content;
mod envelope;
mod error;
mod methods;

pub use content::{ContentItem, PromptMessage, ResourceContents, Role, ToolCallResult};
pub use envelope::{
    parse_frame, Id, IncomingFrame, JsonRpcBatch, JsonRpcError, JsonRpcMessage,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
};
pub use error::ErrorCode;
pub use methods::{
    ClientInfo, GetPromptParams, GetPromptResult, InitializeParams, InitializeResult,
    ListPromptsParams, ListPromptsResult, ListResourceTemplatesResult, ListResourcesParams,
    ListResourcesResult, ListToolsParams, ListToolsResult, LoggingCapability, PromptArgumentDef,
    PromptDefinition, PromptsCapability, ProtocolVersion, ReadResourceParams, ReadResourceResult,
    ResourceDefinition, ResourceTemplateDefinition, ResourcesCapability, ServerCapabilities,
    ServerInfo, SubscribeResourceParams, ToolCallParams, ToolDefinition, ToolsCapability,
    PROTOCOL_VERSIONS,
};
