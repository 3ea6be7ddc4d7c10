//! Tool trait and registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::cursor::{self, DEFAULT_PAGE_SIZE};
use super::error::ProviderError;
use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::session::RequestContext;

/// A single invocable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name, used as the registry key.
    fn name(&self) -> &str;

    /// Human-readable description shown in `tools/list`.
    fn description(&self) -> &str;

    /// JSON-Schema describing accepted arguments.
    fn input_schema(&self) -> Value;

    /// Invoke the tool.
    async fn call(&self, args: Value, ctx: &RequestContext) -> Result<ToolCallResult, ProviderError>;
}

/// The list/call capability a server dispatches `tools/*` through.
///
/// Implemented by both [`ToolRegistry`] (leaf) and
/// [`super::aggregator::ToolAggregator`] (composite), per spec §3's
/// "A Provider may be a Registry (leaf) or an Aggregator (composite)".
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Page through the tools currently registered.
    async fn list(&self, cursor: &str, page_size: usize) -> (Vec<ToolDefinition>, Option<String>);

    /// Invoke a tool by name.
    async fn call(&self, name: &str, args: Value, ctx: &RequestContext) -> Result<ToolCallResult, ProviderError>;
}

/// In-memory, cursor-paginated tool registry.
pub struct ToolRegistry {
    tools: RwLock<BTreeMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a tool, replacing any existing entry with the same name.
    pub async fn register(&self, tool: Arc<dyn Tool>) {
        self.tools.write().await.insert(tool.name().to_string(), tool);
    }

    /// Remove a tool by name. A no-op if it isn't registered.
    pub async fn unregister(&self, name: &str) {
        self.tools.write().await.remove(name);
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolProvider for ToolRegistry {
    async fn list(&self, cursor: &str, page_size: usize) -> (Vec<ToolDefinition>, Option<String>) {
        let page_size = page_size.max(DEFAULT_PAGE_SIZE);
        let tools = self.tools.read().await;
        let (page, next_cursor) = cursor::paginate(&tools, cursor, page_size);
        let defs = page
            .into_iter()
            .map(|(_, tool)| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect();
        (defs, next_cursor)
    }

    async fn call(&self, name: &str, args: Value, ctx: &RequestContext) -> Result<ToolCallResult, ProviderError> {
        let tool = self
            .tools
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))?;
        tool.call(args, ctx).await
    }
}
