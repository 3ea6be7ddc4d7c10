//! Prompt trait and registry.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::cursor::{self, DEFAULT_PAGE_SIZE};
use super::error::ProviderError;
use crate::protocol::{GetPromptResult, PromptArgumentDef, PromptDefinition};
use crate::session::RequestContext;

/// A single named prompt template.
#[async_trait]
pub trait Prompt: Send + Sync {
    /// Unique name, used as the registry key.
    fn name(&self) -> &str;

    /// Human-readable description shown in `prompts/list`.
    fn description(&self) -> &str;

    /// Arguments this prompt accepts.
    fn arguments(&self) -> Vec<PromptArgumentDef>;

    /// Render the prompt with the given argument values.
    async fn render(
        &self,
        args: &HashMap<String, String>,
        ctx: &RequestContext,
    ) -> Result<GetPromptResult, ProviderError>;
}

/// The list/get capability a server dispatches `prompts/*` through.
#[async_trait]
pub trait PromptProvider: Send + Sync {
    /// Page through the prompts currently registered.
    async fn list(&self, cursor: &str, page_size: usize) -> (Vec<PromptDefinition>, Option<String>);

    /// Render a prompt by name.
    async fn get(
        &self,
        name: &str,
        args: &HashMap<String, String>,
        ctx: &RequestContext,
    ) -> Result<GetPromptResult, ProviderError>;
}

/// In-memory, cursor-paginated prompt registry.
pub struct PromptRegistry {
    prompts: RwLock<BTreeMap<String, Arc<dyn Prompt>>>,
}

impl PromptRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prompts: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a prompt, replacing any existing entry with the same name.
    pub async fn register(&self, prompt: Arc<dyn Prompt>) {
        self.prompts.write().await.insert(prompt.name().to_string(), prompt);
    }

    /// Remove a prompt by name. A no-op if it isn't registered.
    pub async fn unregister(&self, name: &str) {
        self.prompts.write().await.remove(name);
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptProvider for PromptRegistry {
    async fn list(&self, cursor: &str, page_size: usize) -> (Vec<PromptDefinition>, Option<String>) {
        let page_size = page_size.max(DEFAULT_PAGE_SIZE);
        let prompts = self.prompts.read().await;
        let (page, next_cursor) = cursor::paginate(&prompts, cursor, page_size);
        let defs = page
            .into_iter()
            .map(|(_, prompt)| PromptDefinition {
                name: prompt.name().to_string(),
                description: prompt.description().to_string(),
                arguments: prompt.arguments(),
            })
            .collect();
        (defs, next_cursor)
    }

    async fn get(
        &self,
        name: &str,
        args: &HashMap<String, String>,
        ctx: &RequestContext,
    ) -> Result<GetPromptResult, ProviderError> {
        let prompt = self
            .prompts
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))?;
        prompt.render(args, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{PromptMessage, Role};
    use crate::session::Session;
    use tokio_util::sync::CancellationToken;

    struct Greeting;

    #[async_trait]
    impl Prompt for Greeting {
        fn name(&self) -> &str {
            "greeting"
        }
        fn description(&self) -> &str {
            "says hello"
        }
        fn arguments(&self) -> Vec<PromptArgumentDef> {
            vec![PromptArgumentDef {
                name: "who".to_string(),
                description: "who to greet".to_string(),
                required: true,
            }]
        }
        async fn render(
            &self,
            args: &HashMap<String, String>,
            _ctx: &RequestContext,
        ) -> Result<GetPromptResult, ProviderError> {
            let who = args.get("who").ok_or_else(|| ProviderError::InvalidArguments("who".to_string()))?;
            Ok(GetPromptResult {
                description: Some("a greeting".to_string()),
                messages: vec![PromptMessage {
                    role: Role::User,
                    content: crate::protocol::ContentItem::text(format!("hello {who}")),
                }],
            })
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new(Arc::new(Session::new()), CancellationToken::new())
    }

    #[tokio::test]
    async fn get_renders_with_supplied_arguments() {
        let registry = PromptRegistry::new();
        registry.register(Arc::new(Greeting)).await;

        let mut args = HashMap::new();
        args.insert("who".to_string(), "world".to_string());
        let result = registry.get("greeting", &args, &ctx()).await.unwrap();
        assert_eq!(result.messages.len(), 1);
    }

    #[tokio::test]
    async fn get_on_unknown_prompt_is_not_found() {
        let registry = PromptRegistry::new();
        let err = registry.get("missing", &HashMap::new(), &ctx()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn get_with_missing_required_argument_fails() {
        let registry = PromptRegistry::new();
        registry.register(Arc::new(Greeting)).await;
        let err = registry.get("greeting", &HashMap::new(), &ctx()).await.unwrap_err();
        assert!(!err.is_not_found());
    }
}
