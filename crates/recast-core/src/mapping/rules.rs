//! Conversion rules and the builders that register them
//!
//! Rules come in two scopes. A *specific* rule is bound to one field name
//! within one (source type, destination type) mapping and is registered
//! through [`TransformBuilder`]. A *global* rule is bound to a (source field
//! type, destination field type) pair and applies to any field matching that
//! pair across all mappings; global rules and the stringify fallback are
//! registered through [`GlobalRuleBuilder`]. Both builders are one-shot:
//! duplicates are configuration errors, never silent overrides.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::shape::{FieldType, TypePair};

use super::synthesizer::synthesize;
use super::Mapper;

/// Conversion function carried by a [`MappingRule`]
pub type RuleFn = dyn Fn(&Value) -> anyhow::Result<Value> + Send + Sync;

/// A conversion rule with a declared (input, output) type signature
///
/// The signature is checked against the actual field types during synthesis;
/// the closure itself runs only when a transform is applied.
#[derive(Clone)]
pub struct MappingRule {
    input: FieldType,
    output: FieldType,
    convert: Arc<RuleFn>,
}

impl MappingRule {
    pub fn new<F>(input: FieldType, output: FieldType, convert: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        MappingRule {
            input,
            output,
            convert: Arc::new(convert),
        }
    }

    /// Declared input type
    pub fn input(&self) -> &FieldType {
        &self.input
    }

    /// Declared output type
    pub fn output(&self) -> &FieldType {
        &self.output
    }

    /// Run the conversion on one value
    pub fn convert(&self, value: &Value) -> anyhow::Result<Value> {
        (self.convert)(value)
    }
}

impl fmt::Debug for MappingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRule")
            .field("input", &self.input)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

/// The committed global rule table plus the stringify fallback flag
///
/// Built once by [`GlobalRuleBuilder::commit`] and immutable afterwards.
#[derive(Debug)]
pub struct GlobalRuleSet {
    rules: HashMap<(FieldType, FieldType), MappingRule>,
    stringify_fallback: bool,
}

impl GlobalRuleSet {
    /// Look up the rule for an exact (input, output) type pair
    pub fn rule_for(&self, input: &FieldType, output: &FieldType) -> Option<&MappingRule> {
        self.rules.get(&(input.clone(), output.clone()))
    }

    /// Whether the render-as-text fallback is enabled
    pub fn stringify_fallback(&self) -> bool {
        self.stringify_fallback
    }
}

/// One-shot builder for the process-wide global rule set
///
/// Obtained from [`Mapper::global_rules`]. Global rules must be committed
/// before any transform is synthesized for any type pair.
pub struct GlobalRuleBuilder<'a> {
    mapper: &'a Mapper,
    rules: HashMap<(FieldType, FieldType), MappingRule>,
    stringify_fallback: bool,
}

impl<'a> GlobalRuleBuilder<'a> {
    pub(super) fn new(mapper: &'a Mapper) -> Self {
        GlobalRuleBuilder {
            mapper,
            rules: HashMap::new(),
            stringify_fallback: false,
        }
    }

    /// Add a rule keyed by its declared (input, output) pair
    pub fn with_rule(mut self, rule: MappingRule) -> Result<Self> {
        let key = (rule.input().clone(), rule.output().clone());
        if self.rules.contains_key(&key) {
            return Err(Error::DuplicateRule {
                message: format!(
                    "a global rule from {} to {} is already defined",
                    key.0, key.1
                ),
            });
        }
        self.rules.insert(key, rule);
        Ok(self)
    }

    /// Enable the render-as-text fallback for textual destination fields
    pub fn with_stringify_fallback(mut self) -> Result<Self> {
        if self.stringify_fallback {
            return Err(Error::DuplicateRule {
                message: "the stringify fallback is already enabled".to_string(),
            });
        }
        self.stringify_fallback = true;
        Ok(self)
    }

    /// Commit the set, making it visible to all subsequent syntheses
    ///
    /// Fails if a global rule set is already committed, or if any transform
    /// has already been synthesized for any type pair.
    pub fn commit(self) -> Result<()> {
        // Checked before taking the rule-set lock so the cache and the rule
        // set are never held together.
        if !self.mapper.cache.is_empty() {
            return Err(Error::ConfigurationOrder {
                message: "global rules must be committed before any transform is synthesized"
                    .to_string(),
            });
        }
        let mut slot = self
            .mapper
            .global_rules
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(Error::ConfigurationOrder {
                message: "global rules are already committed".to_string(),
            });
        }
        *slot = Some(Arc::new(GlobalRuleSet {
            rules: self.rules,
            stringify_fallback: self.stringify_fallback,
        }));
        Ok(())
    }
}

/// One-shot builder for the specific rule table of a single type pair
///
/// Obtained from [`Mapper::transform_builder`]. Committing triggers synthesis
/// for the pair immediately; committing a pair that is already built is a
/// configuration error.
pub struct TransformBuilder<'a> {
    mapper: &'a Mapper,
    pair: TypePair,
    rules: HashMap<String, MappingRule>,
}

impl<'a> TransformBuilder<'a> {
    pub(super) fn new(mapper: &'a Mapper, source_type: &str, dest_type: &str) -> Self {
        TransformBuilder {
            mapper,
            pair: TypePair::new(source_type, dest_type),
            rules: HashMap::new(),
        }
    }

    /// Bind a rule to one field of the destination shape
    pub fn with_rule(mut self, field: impl Into<String>, rule: MappingRule) -> Result<Self> {
        let field = field.into();
        if self.rules.contains_key(&field) {
            return Err(Error::DuplicateRule {
                message: format!("a rule for field '{}' is already defined", field),
            });
        }
        self.rules.insert(field, rule);
        Ok(self)
    }

    /// Synthesize and cache the transform for this pair
    pub fn commit(self) -> Result<()> {
        if self.mapper.cache.contains(&self.pair) {
            return Err(Error::ConfigurationOrder {
                message: format!("mapping rules are already defined for {}", self.pair),
            });
        }
        let source = self.mapper.shape_of(&self.pair.source)?;
        let dest = self.mapper.shape_of(&self.pair.dest)?;
        let global = self.mapper.global_rule_set();
        let transform = synthesize(&source, &dest, global.as_deref(), Some(&self.rules))?;
        self.mapper.cache.insert_new(self.pair, transform)?;
        Ok(())
    }
}
