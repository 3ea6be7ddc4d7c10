//! A minimal built-in tool/prompt/resource so the binary is runnable
//! standalone (SPEC_FULL §1 allows this as ambient CLI plumbing, not a
//! product surface the library ships).

use std::collections::HashMap;

use async_trait::async_trait;
use mcp_core::protocol::{ContentItem, GetPromptResult, PromptArgumentDef, ReadResourceResult, ResourceContents, Role, PromptMessage, ToolCallResult};
use mcp_core::registry::{Prompt, ProviderError, Resource};
use mcp_core::registry::{SubscriptionHandle, SubscriptionSink, Tool};
use mcp_core::session::RequestContext;
use serde_json::Value;

/// Echoes its `text` argument back as a single text content item.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes the supplied text back"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": { "text": { "type": "string" } },
            "required": ["text"],
        })
    }

    async fn call(&self, args: Value, _ctx: &RequestContext) -> Result<ToolCallResult, ProviderError> {
        let text = args
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::InvalidArguments("missing \"text\"".to_string()))?;
        Ok(ToolCallResult::text(text))
    }
}

/// Renders a one-line greeting for a named recipient.
pub struct GreetingPrompt;

#[async_trait]
impl Prompt for GreetingPrompt {
    fn name(&self) -> &str {
        "greeting"
    }

    fn description(&self) -> &str {
        "Greets the named recipient"
    }

    fn arguments(&self) -> Vec<PromptArgumentDef> {
        vec![PromptArgumentDef {
            name: "name".to_string(),
            description: "who to greet".to_string(),
            required: true,
        }]
    }

    async fn render(
        &self,
        args: &HashMap<String, String>,
        _ctx: &RequestContext,
    ) -> Result<GetPromptResult, ProviderError> {
        let name = args
            .get("name")
            .ok_or_else(|| ProviderError::InvalidArguments("name".to_string()))?;
        Ok(GetPromptResult {
            description: Some("a one-line greeting".to_string()),
            messages: vec![PromptMessage {
                role: Role::User,
                content: ContentItem::text(format!("Hello, {name}!")),
            }],
        })
    }
}

/// A static, read-only welcome document.
pub struct WelcomeResource;

#[async_trait]
impl Resource for WelcomeResource {
    fn uri(&self) -> &str {
        "mcp://welcome"
    }

    fn display_name(&self) -> &str {
        "Welcome"
    }

    fn description(&self) -> &str {
        "A static welcome document"
    }

    fn mime_type(&self) -> &str {
        "text/plain"
    }

    async fn read(&self, _ctx: &RequestContext) -> Result<ReadResourceResult, ProviderError> {
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(
                self.uri(),
                self.mime_type(),
                "Welcome to mcp-core. Try the \"echo\" tool or the \"greeting\" prompt.",
            )],
        })
    }

    async fn subscribe(&self) -> Result<(SubscriptionSink, SubscriptionHandle), ProviderError> {
        Err(ProviderError::Failed("welcome never changes".to_string()))
    }
}
