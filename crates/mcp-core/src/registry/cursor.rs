//! Opaque cursor pagination over a lexicographically sorted map.
//!
//! Cursors are typed as plain strings (spec §9 "Cursor opacity") even
//! though the in-memory backend could expose indices, so a persisted
//! backend can be swapped in later without changing the wire contract.

use std::collections::BTreeMap;
use std::ops::Bound;

/// Minimum page size every registry must support (spec §4.2).
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Page through a `BTreeMap` keyed by name/uri.
///
/// An empty `cursor` starts from the first entry. Otherwise entries
/// strictly greater than `cursor` are returned — this holds even if the
/// entry the cursor names was removed between calls, because `BTreeMap`
/// ranges are defined by key order, not by entry identity (spec §4.2
/// "removal of the cursor entry between calls must not break iteration").
pub fn paginate<V: Clone>(
    sorted: &BTreeMap<String, V>,
    cursor: &str,
    page_size: usize,
) -> (Vec<(String, V)>, Option<String>) {
    let lower = if cursor.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(cursor.to_string())
    };

    let mut iter = sorted.range((lower, Bound::Unbounded)).peekable();
    let mut page = Vec::new();
    while page.len() < page_size {
        match iter.next() {
            Some((key, value)) => page.push((key.clone(), value.clone())),
            None => break,
        }
    }

    let next_cursor = if iter.peek().is_some() {
        page.last().map(|(key, _)| key.clone())
    } else {
        None
    };

    (page, next_cursor)
}

/// A composite cursor for [`super::aggregator::Aggregator`]: which provider
/// the page left off in, plus that provider's own opaque inner cursor.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CompositeCursor {
    /// Index of the provider this cursor resumes from
    pub provider_index: usize,
    /// That provider's own cursor
    pub inner_cursor: String,
}

impl CompositeCursor {
    /// Encode as an opaque string.
    #[must_use]
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode from an opaque string. An empty or malformed cursor decodes
    /// to "start from provider 0".
    #[must_use]
    pub fn decode(cursor: &str) -> Self {
        if cursor.is_empty() {
            return Self {
                provider_index: 0,
                inner_cursor: String::new(),
            };
        }
        serde_json::from_str(cursor).unwrap_or(Self {
            provider_index: 0,
            inner_cursor: String::new(),
        })
    }
}
