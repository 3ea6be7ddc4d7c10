//! Typed request/result payloads for the MCP method catalog (spec §4.1, §6).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol versions this server understands, newest first.
///
/// `initialize` must echo one of these back; spec §4.1 calls this a
/// "server-declared allowlist".
pub const PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2024-10-07"];

/// A negotiated protocol version string.
pub type ProtocolVersion = String;

/// Params for `initialize`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// The protocol version requested by the client
    pub protocol_version: ProtocolVersion,
    /// Client identification
    #[serde(default)]
    pub client_info: ClientInfo,
    /// Client-declared capabilities (opaque to the core — forwarded only)
    #[serde(default)]
    pub capabilities: Value,
}

/// Client identification sent with `initialize`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClientInfo {
    /// Client name
    #[serde(default)]
    pub name: String,
    /// Client version
    #[serde(default)]
    pub version: String,
}

/// Result of `initialize`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// The negotiated protocol version (echoed from the request)
    pub protocol_version: ProtocolVersion,
    /// Server info
    pub server_info: ServerInfo,
    /// Server capabilities
    pub capabilities: ServerCapabilities,
}

/// Server identification returned from `initialize`.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// Server capability flags advertised by `initialize`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCapabilities {
    /// Tool-related capabilities
    pub tools: ToolsCapability,
    /// Prompt-related capabilities
    pub prompts: PromptsCapability,
    /// Resource-related capabilities
    pub resources: ResourcesCapability,
    /// Logging capability (presence alone signals support for `logging/setLevel`)
    pub logging: LoggingCapability,
}

/// Tool capability flags.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// Whether the server emits `notifications/tools/list_changed`
    pub list_changed: bool,
}

/// Prompt capability flags.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptsCapability {
    /// Whether the server emits list-changed notifications for prompts
    pub list_changed: bool,
}

/// Resource capability flags.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesCapability {
    /// Whether `resources/subscribe` is supported
    pub subscribe: bool,
    /// Whether the server emits list-changed notifications for resources
    pub list_changed: bool,
}

/// Logging capability marker (empty object when present).
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoggingCapability {}

/// Params shared by every cursor-paginated `*/list` method.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListToolsParams {
    /// Opaque pagination cursor; empty/absent starts from the beginning
    #[serde(default)]
    pub cursor: String,
}

/// Params for `prompts/list`.
pub type ListPromptsParams = ListToolsParams;
/// Params for `resources/list`.
pub type ListResourcesParams = ListToolsParams;

/// Result of `tools/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListToolsResult {
    /// Tools visible on this page
    pub tools: Vec<ToolDefinition>,
    /// Cursor for the next page; absent/empty when this is the last page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// A tool's public definition, as returned by `tools/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name, unique within the registry
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Opaque JSON-Schema for the tool's input
    pub input_schema: Value,
}

/// Result of `prompts/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPromptsResult {
    /// Prompts visible on this page
    pub prompts: Vec<PromptDefinition>,
    /// Cursor for the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// A prompt's public definition.
#[derive(Debug, Clone, Serialize)]
pub struct PromptDefinition {
    /// Prompt name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Accepted arguments
    pub arguments: Vec<PromptArgumentDef>,
}

/// One argument a prompt accepts.
#[derive(Debug, Clone, Serialize)]
pub struct PromptArgumentDef {
    /// Argument name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Whether the argument must be supplied
    pub required: bool,
}

/// Result of `resources/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResourcesResult {
    /// Resources visible on this page
    pub resources: Vec<ResourceDefinition>,
    /// Cursor for the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// A resource's public definition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    /// Resource URI, unique within the registry
    pub uri: String,
    /// Display name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// MIME type
    pub mime_type: String,
}

/// Result of `resources/templates/list`.
///
/// The core ships no resource-template providers itself (none are named by
/// spec §4.1 beyond the method slot), so this is always an empty page; a
/// provider-backed implementation can populate it later without a wire
/// format change.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResourceTemplatesResult {
    /// Templates visible on this page (always empty in the core)
    pub resource_templates: Vec<ResourceTemplateDefinition>,
    /// Cursor for the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// A resource template definition (reserved for future provider use).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplateDefinition {
    /// URI template, e.g. `"file:///{path}"`
    pub uri_template: String,
    /// Display name
    pub name: String,
    /// MIME type
    pub mime_type: String,
}

/// Params for `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Tool name
    pub name: String,
    /// Tool arguments
    #[serde(default)]
    pub arguments: Value,
}

/// Params for `prompts/get`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetPromptParams {
    /// Prompt name
    pub name: String,
    /// Argument values, keyed by argument name
    #[serde(default)]
    pub arguments: std::collections::HashMap<String, String>,
}

/// Result of `prompts/get`.
#[derive(Debug, Clone, Serialize)]
pub struct GetPromptResult {
    /// Human-readable description of the rendered prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The rendered conversation turns
    pub messages: Vec<super::content::PromptMessage>,
}

/// Params for `resources/read`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadResourceParams {
    /// Resource URI
    pub uri: String,
}

/// Result of `resources/read`.
#[derive(Debug, Clone, Serialize)]
pub struct ReadResourceResult {
    /// The resource's contents
    pub contents: Vec<super::content::ResourceContents>,
}

/// Params for `resources/subscribe` and `resources/unsubscribe`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeResourceParams {
    /// Resource URI to (un)subscribe from
    pub uri: String,
}
