//! Resource trait and registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::cursor::{self, DEFAULT_PAGE_SIZE};
use super::error::ProviderError;
use super::subscription::{SubscriptionHandle, SubscriptionSink};
use crate::protocol::{ReadResourceResult, ResourceDefinition};
use crate::session::RequestContext;

/// A single readable, optionally subscribable resource.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Unique URI, used as the registry key.
    fn uri(&self) -> &str;

    /// Display name shown in `resources/list`.
    fn display_name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// MIME type of the resource's contents.
    fn mime_type(&self) -> &str;

    /// Read the resource's current contents.
    async fn read(&self, ctx: &RequestContext) -> Result<ReadResourceResult, ProviderError>;

    /// Subscribe to update notifications. Resources that never change can
    /// leave the default, which reports "not implemented" rather than
    /// "not found" — the resource exists, subscription just isn't offered.
    async fn subscribe(&self) -> Result<(SubscriptionSink, SubscriptionHandle), ProviderError> {
        Err(ProviderError::Failed("resource does not support subscription".to_string()))
    }
}

/// The list/read/subscribe capability a server dispatches `resources/*`
/// through.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Page through the resources currently registered.
    async fn list(&self, cursor: &str, page_size: usize) -> (Vec<ResourceDefinition>, Option<String>);

    /// Read a resource by uri.
    async fn read(&self, uri: &str, ctx: &RequestContext) -> Result<ReadResourceResult, ProviderError>;

    /// Subscribe to a resource's update notifications by uri.
    async fn subscribe(&self, uri: &str) -> Result<(SubscriptionSink, SubscriptionHandle), ProviderError>;
}

/// In-memory, cursor-paginated resource registry.
pub struct ResourceRegistry {
    resources: RwLock<BTreeMap<String, Arc<dyn Resource>>>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a resource, replacing any existing entry with the same uri.
    pub async fn register(&self, resource: Arc<dyn Resource>) {
        self.resources.write().await.insert(resource.uri().to_string(), resource);
    }

    /// Remove a resource by uri. A no-op if it isn't registered.
    pub async fn unregister(&self, uri: &str) {
        self.resources.write().await.remove(uri);
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceProvider for ResourceRegistry {
    async fn list(&self, cursor: &str, page_size: usize) -> (Vec<ResourceDefinition>, Option<String>) {
        let page_size = page_size.max(DEFAULT_PAGE_SIZE);
        let resources = self.resources.read().await;
        let (page, next_cursor) = cursor::paginate(&resources, cursor, page_size);
        let defs = page
            .into_iter()
            .map(|(_, resource)| ResourceDefinition {
                uri: resource.uri().to_string(),
                name: resource.display_name().to_string(),
                description: resource.description().to_string(),
                mime_type: resource.mime_type().to_string(),
            })
            .collect();
        (defs, next_cursor)
    }

    async fn read(&self, uri: &str, ctx: &RequestContext) -> Result<ReadResourceResult, ProviderError> {
        let resource = self
            .resources
            .read()
            .await
            .get(uri)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(uri.to_string()))?;
        resource.read(ctx).await
    }

    async fn subscribe(&self, uri: &str) -> Result<(SubscriptionSink, SubscriptionHandle), ProviderError> {
        let resource = self
            .resources
            .read()
            .await
            .get(uri)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(uri.to_string()))?;
        resource.subscribe().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ResourceContents;
    use crate::session::Session;
    use tokio_util::sync::CancellationToken;

    struct StaticFile;

    #[async_trait]
    impl Resource for StaticFile {
        fn uri(&self) -> &str {
            "file:///static.txt"
        }
        fn display_name(&self) -> &str {
            "static.txt"
        }
        fn description(&self) -> &str {
            "a static file"
        }
        fn mime_type(&self) -> &str {
            "text/plain"
        }
        async fn read(&self, _ctx: &RequestContext) -> Result<ReadResourceResult, ProviderError> {
            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(self.uri(), self.mime_type(), "hello")],
            })
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new(Arc::new(Session::new()), CancellationToken::new())
    }

    #[tokio::test]
    async fn read_returns_registered_contents() {
        let registry = ResourceRegistry::new();
        registry.register(Arc::new(StaticFile)).await;
        let result = registry.read("file:///static.txt", &ctx()).await.unwrap();
        assert_eq!(result.contents.len(), 1);
    }

    #[tokio::test]
    async fn read_on_unknown_uri_is_not_found() {
        let registry = ResourceRegistry::new();
        let err = registry.read("file:///missing.txt", &ctx()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn subscribe_defaults_to_unsupported() {
        let registry = ResourceRegistry::new();
        registry.register(Arc::new(StaticFile)).await;
        let err = registry.subscribe("file:///static.txt").await.unwrap_err();
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn subscribe_on_unknown_uri_is_not_found() {
        let registry = ResourceRegistry::new();
        let err = registry.subscribe("file:///missing.txt").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
