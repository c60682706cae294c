//! Transform synthesis: per-field rule resolution and the compiled result
//!
//! Synthesis walks the matched fields of a type pair and decides, per field,
//! whether to copy directly, invoke a specific rule, invoke a global rule, or
//! fall back to rendering as text. The decisions are assembled into a
//! [`CompiledTransform`] holding an interpreted per-field binding list.
//! Synthesis is all-or-nothing: a single unresolvable field fails the whole
//! pair and nothing is cached.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::shape::{json_kind, TypePair, TypeShape};

use super::matcher::{match_fields, MatchedField};
use super::rules::{GlobalRuleSet, MappingRule};

/// Resolved operation for one matched field
#[derive(Debug, Clone)]
enum BindingOp {
    /// Source and destination types agree; the value is copied as-is
    Copy,
    /// A specific or global rule converts the value
    Rule(MappingRule),
    /// The stringify fallback renders the value as text
    Stringify,
}

#[derive(Debug, Clone)]
struct FieldBinding {
    field: String,
    op: BindingOp,
}

/// The synthesized transform for one (source type, destination type) pair
///
/// Immutable once built and safe for unsynchronized concurrent invocation.
/// Owned by the transform cache; callers hold it behind an `Arc`.
#[derive(Debug)]
pub struct CompiledTransform {
    pair: TypePair,
    bindings: Vec<FieldBinding>,
    defaults: Vec<(String, Value)>,
}

impl CompiledTransform {
    /// The type pair this transform was synthesized for
    pub fn pair(&self) -> &TypePair {
        &self.pair
    }

    /// Build a destination value from a source value
    ///
    /// A null source short-circuits to a null result without invoking any
    /// binding. Matched fields are assigned per their resolved operation; a
    /// field missing from the concrete source value reads as null. Writable
    /// destination fields outside the match set are assigned their type's
    /// default-initialized value.
    pub fn apply(&self, source: &Value) -> Result<Value> {
        if source.is_null() {
            return Ok(Value::Null);
        }
        let source_object = source.as_object().ok_or_else(|| Error::SourceNotObject {
            type_name: self.pair.source.clone(),
            actual: json_kind(source).to_string(),
        })?;

        let mut output =
            serde_json::Map::with_capacity(self.bindings.len() + self.defaults.len());
        for binding in &self.bindings {
            let input = source_object
                .get(&binding.field)
                .cloned()
                .unwrap_or(Value::Null);
            let value = match &binding.op {
                BindingOp::Copy => input,
                BindingOp::Rule(rule) => {
                    rule.convert(&input)
                        .map_err(|source| Error::RuleApplication {
                            field: binding.field.clone(),
                            source,
                        })?
                }
                BindingOp::Stringify => stringify(&input),
            };
            output.insert(binding.field.clone(), value);
        }
        for (field, value) in &self.defaults {
            output.insert(field.clone(), value.clone());
        }
        Ok(Value::Object(output))
    }
}

/// Synthesize the transform for one type pair
///
/// `specific` is the per-pair rule table (field name keyed), `global` the
/// committed global rule set, either of which may be absent. When neither is
/// present the field match enforces type equality and everything resolves to
/// a direct copy.
pub(crate) fn synthesize(
    source: &TypeShape,
    dest: &TypeShape,
    global: Option<&GlobalRuleSet>,
    specific: Option<&HashMap<String, MappingRule>>,
) -> Result<CompiledTransform> {
    let has_rules = global.is_some() || specific.is_some_and(|rules| !rules.is_empty());
    let matched = match_fields(source, dest, !has_rules);

    let mut bindings = Vec::with_capacity(matched.len());
    for field in &matched {
        bindings.push(FieldBinding {
            field: field.name.clone(),
            op: resolve(field, global, specific)?,
        });
    }

    let matched_names: HashSet<&str> = matched.iter().map(|m| m.name.as_str()).collect();
    let defaults: Vec<(String, Value)> = dest
        .writable_fields()
        .filter(|f| !matched_names.contains(f.name.as_str()))
        .map(|f| (f.name.clone(), f.field_type.default_value()))
        .collect();

    let pair = TypePair::new(source.name(), dest.name());
    log::debug!(
        "synthesized transform for {}: {} bindings, {} defaulted fields",
        pair,
        bindings.len(),
        defaults.len()
    );

    Ok(CompiledTransform {
        pair,
        bindings,
        defaults,
    })
}

/// Pick the binding for one matched field; first match wins
fn resolve(
    field: &MatchedField,
    global: Option<&GlobalRuleSet>,
    specific: Option<&HashMap<String, MappingRule>>,
) -> Result<BindingOp> {
    if let Some(rule) = specific.and_then(|rules| rules.get(&field.name)) {
        if rule.input() != &field.source_type || rule.output() != &field.dest_type {
            return Err(Error::RuleTypeMismatch {
                field: field.name.clone(),
                declared_input: rule.input().clone(),
                declared_output: rule.output().clone(),
                source_type: field.source_type.clone(),
                dest_type: field.dest_type.clone(),
            });
        }
        return Ok(BindingOp::Rule(rule.clone()));
    }

    if field.source_type == field.dest_type {
        return Ok(BindingOp::Copy);
    }

    if let Some(set) = global {
        if let Some(rule) = set.rule_for(&field.source_type, &field.dest_type) {
            return Ok(BindingOp::Rule(rule.clone()));
        }
        if set.stringify_fallback() && field.dest_type.is_text() {
            return Ok(BindingOp::Stringify);
        }
    }

    Err(Error::NoApplicableRule {
        field: field.name.clone(),
        source_type: field.source_type.clone(),
        dest_type: field.dest_type.clone(),
    })
}

/// Render a scalar as text; strings pass through, null stays null
fn stringify(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(text) => Value::String(text.clone()),
        other => Value::String(other.to_string()),
    }
}
