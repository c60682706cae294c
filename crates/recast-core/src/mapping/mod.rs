//! Shape-to-shape mapping engine
//!
//! This module implements the mapping surface of Recast: the [`Mapper`]
//! context owning registered shapes, committed rules, and the transform
//! cache, plus the entry points for mapping single values and sequences.
//!
//! A mapping request for a pair of type names consults the cache first; on a
//! miss the field matcher and the rule tables feed the synthesizer, whose
//! output is cached and shared by every later request for the same pair.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

pub mod built_in;
mod cache;
pub mod matcher;
pub mod rules;
pub mod synthesizer;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::shape::{TypePair, TypeShape};

use cache::TransformCache;

pub use rules::{GlobalRuleBuilder, GlobalRuleSet, MappingRule, RuleFn, TransformBuilder};
pub use synthesizer::CompiledTransform;

/// Mapping context owning shapes, rules, and the transform cache
///
/// The mapper is an explicitly owned object rather than hidden global state:
/// independent contexts can coexist, and tests construct their own instead of
/// sharing one. It is `Send + Sync`; any number of threads may map through it
/// concurrently. Configuration (shape registration, rule commits) belongs to
/// a single-threaded setup phase.
#[derive(Debug, Default)]
pub struct Mapper {
    shapes: RwLock<HashMap<String, Arc<TypeShape>>>,
    global_rules: RwLock<Option<Arc<GlobalRuleSet>>>,
    cache: TransformCache,
}

impl Mapper {
    pub fn new() -> Self {
        Mapper::default()
    }

    /// Register a shape under its type name
    pub fn register_shape(&self, shape: TypeShape) -> Result<()> {
        let mut shapes = self.shapes.write().unwrap_or_else(PoisonError::into_inner);
        if shapes.contains_key(shape.name()) {
            return Err(Error::DuplicateShape {
                type_name: shape.name().to_string(),
            });
        }
        shapes.insert(shape.name().to_string(), Arc::new(shape));
        Ok(())
    }

    /// Look up a registered shape
    pub fn shape_of(&self, type_name: &str) -> Result<Arc<TypeShape>> {
        self.shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()
            .ok_or_else(|| Error::UnknownShape {
                type_name: type_name.to_string(),
            })
    }

    /// Begin registering the global rule set
    pub fn global_rules(&self) -> GlobalRuleBuilder<'_> {
        GlobalRuleBuilder::new(self)
    }

    /// Begin registering specific rules for one type pair
    pub fn transform_builder(&self, source_type: &str, dest_type: &str) -> TransformBuilder<'_> {
        TransformBuilder::new(self, source_type, dest_type)
    }

    /// Map a single value from `source_type` to `dest_type`
    ///
    /// A null source yields a null result. The transform for the pair is
    /// synthesized on first use (without specific rules, if none were
    /// committed) and reused afterwards.
    pub fn map(&self, source: &Value, source_type: &str, dest_type: &str) -> Result<Value> {
        if source.is_null() {
            return Ok(Value::Null);
        }
        let transform = self.transform_or_build(source_type, dest_type)?;
        transform.apply(source)
    }

    /// Lazily map a sequence of values, preserving input order
    ///
    /// `None` in, `None` out; otherwise each element is transformed on
    /// iteration through the shared cached transform. Null elements map to
    /// null elements.
    pub fn map_many<I>(
        &self,
        sources: Option<I>,
        source_type: &str,
        dest_type: &str,
    ) -> Result<Option<MappedValues<I::IntoIter>>>
    where
        I: IntoIterator<Item = Value>,
    {
        let Some(sources) = sources else {
            return Ok(None);
        };
        let transform = self.transform_or_build(source_type, dest_type)?;
        Ok(Some(MappedValues {
            transform,
            inner: sources.into_iter(),
        }))
    }

    /// Retrieve the cached transform for a pair without creating one
    pub fn transform(&self, source_type: &str, dest_type: &str) -> Option<Arc<CompiledTransform>> {
        self.cache.get(&TypePair::new(source_type, dest_type))
    }

    /// Clear the cache and discard the global rule set
    ///
    /// Registered shapes survive. Intended for isolating independent test
    /// scenarios, never for normal operation.
    pub fn reset(&self) {
        self.cache.clear();
        *self
            .global_rules
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn transform_or_build(
        &self,
        source_type: &str,
        dest_type: &str,
    ) -> Result<Arc<CompiledTransform>> {
        let pair = TypePair::new(source_type, dest_type);
        self.cache.get_or_build(&pair, || {
            let source = self.shape_of(source_type)?;
            let dest = self.shape_of(dest_type)?;
            let global = self.global_rule_set();
            synthesizer::synthesize(&source, &dest, global.as_deref(), None)
        })
    }

    pub(crate) fn global_rule_set(&self) -> Option<Arc<GlobalRuleSet>> {
        self.global_rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Lazy iterator over mapped elements, sharing one cached transform
pub struct MappedValues<I> {
    transform: Arc<CompiledTransform>,
    inner: I,
}

impl<I> Iterator for MappedValues<I>
where
    I: Iterator<Item = Value>,
{
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|value| self.transform.apply(&value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
