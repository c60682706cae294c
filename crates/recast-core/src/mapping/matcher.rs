//! Field matching between two type shapes
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::shape::{FieldType, TypeShape};

/// A field present in both shapes, carrying its type on each side
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedField {
    pub name: String,
    pub source_type: FieldType,
    pub dest_type: FieldType,
}

/// Compute the ordered set of fields shared by two shapes
///
/// A field matches when its name appears on both sides and the destination
/// descriptor is writable. With `enforce_type_equality` set (used when no
/// rules of any kind are configured for the pair), fields whose types differ
/// are silently dropped rather than reported; the caller resolves divergent
/// types per field otherwise.
///
/// A source type identical to the destination type short-circuits into the
/// identity match: every writable field maps to itself.
///
/// Output follows source-shape declaration order. Field names are unique
/// within a shape, so no tie-breaking is needed.
pub fn match_fields(
    source: &TypeShape,
    dest: &TypeShape,
    enforce_type_equality: bool,
) -> Vec<MatchedField> {
    if source.name() == dest.name() {
        return dest
            .writable_fields()
            .map(|f| MatchedField {
                name: f.name.clone(),
                source_type: f.field_type.clone(),
                dest_type: f.field_type.clone(),
            })
            .collect();
    }

    source
        .fields()
        .iter()
        .filter_map(|src_field| {
            let dest_field = dest.field(&src_field.name).filter(|f| f.writable)?;
            if enforce_type_equality && src_field.field_type != dest_field.field_type {
                return None;
            }
            Some(MatchedField {
                name: src_field.name.clone(),
                source_type: src_field.field_type.clone(),
                dest_type: dest_field.field_type.clone(),
            })
        })
        .collect()
}
