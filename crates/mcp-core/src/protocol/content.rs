//! Content model shared by tool results, prompt messages, and resource reads.

use serde::{Deserialize, Serialize};

/// One item of content in a tool result or prompt message.
///
/// Generalizes the teacher's two-variant content model (text/image) to the
/// three variants spec §3 names, adding `resource` (an embedded resource
/// read, used when a tool wants to hand back file-like content inline).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentItem {
    /// Plain text content
    #[serde(rename = "text")]
    Text {
        /// The text content
        text: String,
    },
    /// Base64-encoded image content
    #[serde(rename = "image")]
    Image {
        /// Base64-encoded image bytes
        data: String,
        /// MIME type, e.g. `"image/png"`
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    /// An embedded resource
    #[serde(rename = "resource")]
    Resource {
        /// The embedded resource contents
        resource: ResourceContents,
    },
}

impl ContentItem {
    /// Build a text content item.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text { text: s.into() }
    }

    /// Build an image content item.
    #[must_use]
    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Image {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Build a resource content item.
    #[must_use]
    pub const fn resource(resource: ResourceContents) -> Self {
        Self::Resource { resource }
    }
}

/// The contents of a resource read (inline or embedded in a tool result).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    /// The resource's URI
    pub uri: String,
    /// MIME type
    pub mime_type: String,
    /// UTF-8 text contents, mutually exclusive with `blob`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64-encoded binary contents, mutually exclusive with `text`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
}

impl ResourceContents {
    /// Build text resource contents.
    #[must_use]
    pub fn text(uri: impl Into<String>, mime_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
            text: Some(text.into()),
            blob: None,
        }
    }

    /// Build binary (base64) resource contents.
    #[must_use]
    pub fn blob(uri: impl Into<String>, mime_type: impl Into<String>, blob: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
            text: None,
            blob: Some(blob.into()),
        }
    }
}

/// The result of `tools/call`: an ordered list of content items plus a
/// tool-reported error flag (distinct from a protocol-level `JsonRpcError`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Result content
    pub content: Vec<ContentItem>,
    /// Whether the tool itself reported failure (vs. a protocol error)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Build a successful, text-only result.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(s)],
            is_error: false,
        }
    }

    /// Build an arbitrary-content successful result.
    #[must_use]
    pub const fn new(content: Vec<ContentItem>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    /// Build a tool-reported failure result.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(message)],
            is_error: true,
        }
    }
}

/// The role a [`PromptMessage`] is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Authored by the user
    User,
    /// Authored by the assistant
    Assistant,
}

/// A single message returned by `prompts/get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptMessage {
    /// Who the message is attributed to
    pub role: Role,
    /// The message content
    pub content: ContentItem,
}

impl PromptMessage {
    /// Build a user-authored text message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: ContentItem::text(text),
        }
    }

    /// Build an assistant-authored text message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: ContentItem::text(text),
        }
    }
}
