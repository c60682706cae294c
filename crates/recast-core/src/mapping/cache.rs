//! Memoization of synthesized transforms
//!
//! The cache guarantees at most one synthesis per type pair even when many
//! callers race on first use. The fast path is a shared read lock; a miss
//! takes the write lock, re-checks for a winner that got there first, and
//! only then synthesizes. Entries are never evicted or replaced; the only way
//! to clear them is the explicit reset used for test isolation.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::shape::TypePair;

use super::synthesizer::CompiledTransform;

#[derive(Debug, Default)]
pub(super) struct TransformCache {
    entries: RwLock<HashMap<TypePair, Arc<CompiledTransform>>>,
}

impl TransformCache {
    pub fn new() -> Self {
        TransformCache::default()
    }

    /// Shared-lock lookup; never synthesizes
    pub fn get(&self, pair: &TypePair) -> Option<Arc<CompiledTransform>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pair)
            .cloned()
    }

    /// Return the cached transform, synthesizing it under the write lock on a miss
    pub fn get_or_build<F>(&self, pair: &TypePair, build: F) -> Result<Arc<CompiledTransform>>
    where
        F: FnOnce() -> Result<CompiledTransform>,
    {
        if let Some(transform) = self.get(pair) {
            log::trace!("transform cache hit for {}", pair);
            return Ok(transform);
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have built the transform between the read check
        // and acquiring the write lock.
        if let Some(transform) = entries.get(pair) {
            return Ok(transform.clone());
        }
        let built = Arc::new(build()?);
        entries.insert(pair.clone(), built.clone());
        Ok(built)
    }

    /// Insert a transform built by an explicit rule commit; the pair must be absent
    pub fn insert_new(&self, pair: TypePair, transform: CompiledTransform) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(&pair) {
            return Err(Error::ConfigurationOrder {
                message: format!("a transform is already cached for {}", pair),
            });
        }
        entries.insert(pair, Arc::new(transform));
        Ok(())
    }

    pub fn contains(&self, pair: &TypePair) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(pair)
    }

    /// Whether any transform has been synthesized yet
    pub fn is_empty(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
