//! Composite providers: fan out `List`/`Call`/`Get`/`Read` across an ordered
//! list of providers of the same kind (spec §4.2 "Aggregator").
//!
//! `List` concatenates each provider's page and re-sorts it, carrying a
//! composite cursor that remembers which provider the page left off in.
//! `Call`/`Get`/`Read` try providers in registration order; the first
//! non-"not found" result — success or failure — wins, so a provider can
//! shadow another's entry of the same name as long as it answers at all.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::cursor::{CompositeCursor, DEFAULT_PAGE_SIZE};
use super::error::ProviderError;
use super::prompt::PromptProvider;
use super::resource::ResourceProvider;
use super::subscription::{SubscriptionHandle, SubscriptionSink};
use super::tool::ToolProvider;
use crate::protocol::{
    GetPromptResult, PromptDefinition, ReadResourceResult, ResourceDefinition, ToolCallResult,
    ToolDefinition,
};
use crate::session::RequestContext;

/// Fans `tools/*` out across an ordered list of [`ToolProvider`]s.
pub struct ToolAggregator {
    providers: Vec<Arc<dyn ToolProvider>>,
}

impl ToolAggregator {
    /// Build an aggregator over the given providers, tried in order.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn ToolProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl ToolProvider for ToolAggregator {
    async fn list(&self, cursor: &str, page_size: usize) -> (Vec<ToolDefinition>, Option<String>) {
        let page_size = page_size.max(DEFAULT_PAGE_SIZE);
        let start = CompositeCursor::decode(cursor);
        let mut entries = Vec::new();
        let mut provider_index = start.provider_index;
        let mut inner_cursor = start.inner_cursor;

        while provider_index < self.providers.len() && entries.len() < page_size {
            let remaining = page_size - entries.len();
            let (mut page, next_inner) = self.providers[provider_index].list(&inner_cursor, remaining).await;
            entries.append(&mut page);
            match next_inner {
                Some(next) => {
                    inner_cursor = next;
                    break;
                }
                None => {
                    provider_index += 1;
                    inner_cursor = String::new();
                }
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let next_cursor = if provider_index < self.providers.len() {
            Some(CompositeCursor { provider_index, inner_cursor }.encode())
        } else {
            None
        };

        (entries, next_cursor)
    }

    async fn call(&self, name: &str, args: Value, ctx: &RequestContext) -> Result<ToolCallResult, ProviderError> {
        let mut last_not_found = ProviderError::NotFound(name.to_string());
        for provider in &self.providers {
            match provider.call(name, args.clone(), ctx).await {
                Err(e) if e.is_not_found() => last_not_found = e,
                other => return other,
            }
        }
        Err(last_not_found)
    }
}

/// Fans `prompts/*` out across an ordered list of [`PromptProvider`]s.
pub struct PromptAggregator {
    providers: Vec<Arc<dyn PromptProvider>>,
}

impl PromptAggregator {
    /// Build an aggregator over the given providers, tried in order.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn PromptProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl PromptProvider for PromptAggregator {
    async fn list(&self, cursor: &str, page_size: usize) -> (Vec<PromptDefinition>, Option<String>) {
        let page_size = page_size.max(DEFAULT_PAGE_SIZE);
        let start = CompositeCursor::decode(cursor);
        let mut entries = Vec::new();
        let mut provider_index = start.provider_index;
        let mut inner_cursor = start.inner_cursor;

        while provider_index < self.providers.len() && entries.len() < page_size {
            let remaining = page_size - entries.len();
            let (mut page, next_inner) = self.providers[provider_index].list(&inner_cursor, remaining).await;
            entries.append(&mut page);
            match next_inner {
                Some(next) => {
                    inner_cursor = next;
                    break;
                }
                None => {
                    provider_index += 1;
                    inner_cursor = String::new();
                }
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let next_cursor = if provider_index < self.providers.len() {
            Some(CompositeCursor { provider_index, inner_cursor }.encode())
        } else {
            None
        };

        (entries, next_cursor)
    }

    async fn get(
        &self,
        name: &str,
        args: &HashMap<String, String>,
        ctx: &RequestContext,
    ) -> Result<GetPromptResult, ProviderError> {
        let mut last_not_found = ProviderError::NotFound(name.to_string());
        for provider in &self.providers {
            match provider.get(name, args, ctx).await {
                Err(e) if e.is_not_found() => last_not_found = e,
                other => return other,
            }
        }
        Err(last_not_found)
    }
}

/// Fans `resources/*` out across an ordered list of [`ResourceProvider`]s.
pub struct ResourceAggregator {
    providers: Vec<Arc<dyn ResourceProvider>>,
}

impl ResourceAggregator {
    /// Build an aggregator over the given providers, tried in order.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn ResourceProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl ResourceProvider for ResourceAggregator {
    async fn list(&self, cursor: &str, page_size: usize) -> (Vec<ResourceDefinition>, Option<String>) {
        let page_size = page_size.max(DEFAULT_PAGE_SIZE);
        let start = CompositeCursor::decode(cursor);
        let mut entries = Vec::new();
        let mut provider_index = start.provider_index;
        let mut inner_cursor = start.inner_cursor;

        while provider_index < self.providers.len() && entries.len() < page_size {
            let remaining = page_size - entries.len();
            let (mut page, next_inner) = self.providers[provider_index].list(&inner_cursor, remaining).await;
            entries.append(&mut page);
            match next_inner {
                Some(next) => {
                    inner_cursor = next;
                    break;
                }
                None => {
                    provider_index += 1;
                    inner_cursor = String::new();
                }
            }
        }

        entries.sort_by(|a, b| a.uri.cmp(&b.uri));

        let next_cursor = if provider_index < self.providers.len() {
            Some(CompositeCursor { provider_index, inner_cursor }.encode())
        } else {
            None
        };

        (entries, next_cursor)
    }

    async fn read(&self, uri: &str, ctx: &RequestContext) -> Result<ReadResourceResult, ProviderError> {
        let mut last_not_found = ProviderError::NotFound(uri.to_string());
        for provider in &self.providers {
            match provider.read(uri, ctx).await {
                Err(e) if e.is_not_found() => last_not_found = e,
                other => return other,
            }
        }
        Err(last_not_found)
    }

    async fn subscribe(&self, uri: &str) -> Result<(SubscriptionSink, SubscriptionHandle), ProviderError> {
        let mut last_not_found = ProviderError::NotFound(uri.to_string());
        for provider in &self.providers {
            match provider.subscribe(uri).await {
                Err(e) if e.is_not_found() => last_not_found = e,
                other => return other,
            }
        }
        Err(last_not_found)
    }
}
