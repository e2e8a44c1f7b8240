//! Mapping cache
//!
//! Holds resolved field sequences keyed by shape name. Entries are written at
//! most once and never change afterwards; failed resolutions are not stored.

use super::sequence::FieldSequence;
use crate::errors::Result;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Concurrency-safe shape name → field sequence map
///
/// Concurrent first lookups of the same key may each run the computation; the
/// first stored result wins and every caller gets that stored value back.
#[derive(Debug, Default)]
pub struct FieldOrderCache {
    entries: RwLock<HashMap<String, FieldSequence>>,
}

impl FieldOrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached sequence for `key`, if resolved
    pub fn get(&self, key: &str) -> Option<FieldSequence> {
        // Entries are immutable once inserted, so a poisoned map is still consistent
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    /// Cached sequence for `key`, running `compute` on a miss
    ///
    /// # Errors
    ///
    /// Propagates the error from `compute`; nothing is cached in that case, so
    /// the next call computes again.
    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> Result<FieldSequence>
    where
        F: FnOnce() -> Result<FieldSequence>,
    {
        if let Some(hit) = self.get(key) {
            tracing::debug!(shape = key, "field order cache hit");
            return Ok(hit);
        }

        tracing::debug!(shape = key, "field order cache miss");
        let computed = compute()?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let stored = entries.entry(key.to_string()).or_insert(computed);
        Ok(stored.clone())
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
