//! Citation parse cache
//!
//! An explicit, injectable memoization of `parse` keyed by the normalized
//! citation string. Owners must call `invalidate` whenever an Index or
//! Version of a book changes, which keeps the cache's lifecycle visible
//! and testable instead of hiding it in process-wide state.

use std::collections::HashMap;

use crate::citation::parser::{self, normalize_input};
use crate::citation::reference::Ref;
use crate::errors::Result;
use crate::ops::Library;

/// Memoized citation parser with explicit invalidation
#[derive(Debug, Default)]
pub struct RefCache {
    entries: HashMap<String, Ref>,
    hits: u64,
    misses: u64,
}

impl RefCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a citation through the cache (padded parse)
    ///
    /// Only the default padded parse is memoized; callers that need an
    /// unpadded parse go to the parser directly.
    pub fn parse(&mut self, lib: &Library, s: &str) -> Result<Ref> {
        let key = normalize_input(s);
        if let Some(cached) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(cached.clone());
        }

        let parsed = parser::parse(lib, s)?;
        self.misses += 1;
        self.entries.insert(key, parsed.clone());
        Ok(parsed)
    }

    /// Drop every cached address into a book or into its commentary layers
    pub fn invalidate(&mut self, title: &str) {
        self.entries
            .retain(|_, r| r.book != title && r.base_title.as_deref() != Some(title));
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
