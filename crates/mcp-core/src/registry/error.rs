//! Errors shared by every provider kind.

use thiserror::Error;

/// An error raised by a tool/prompt/resource provider.
///
/// The `NotFound` variant is load-bearing: [`super::aggregator`] uses
/// [`ProviderError::is_not_found`] to decide whether to fall through to the
/// next provider in the chain (spec §4.2 "first non-'not found' result...
/// wins").
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No entry with this name/uri exists on this provider
    #[error("not found: {0}")]
    NotFound(String),

    /// The entry exists but invocation failed
    #[error("{0}")]
    Failed(String),

    /// Arguments failed validation against the entry's schema
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

impl ProviderError {
    /// Whether this is the canonical "no such entry" error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
