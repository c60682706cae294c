//! Type shapes and field descriptors
//!
//! A [`TypeShape`] is the mapping engine's view of a structural type: its name
//! plus the ordered list of named, typed fields it exposes. Shapes are declared
//! once through [`ShapeBuilder`] or inferred from a sample value, and are never
//! mutated afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Logical value type of a mapped field
///
/// The primitive variants cover JSON's scalar types; `Named` identifies
/// domain types (dates, enums, decimals) whose values are carried as JSON
/// scalars but must not be confused with them during rule resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Boolean,
    Named(String),
}

impl FieldType {
    /// Shorthand for a named domain type
    pub fn named(name: impl Into<String>) -> Self {
        FieldType::Named(name.into())
    }

    /// Whether this is the textual type targeted by the stringify fallback
    pub fn is_text(&self) -> bool {
        matches!(self, FieldType::Text)
    }

    /// Default-initialized value assigned to unmatched destination fields
    pub fn default_value(&self) -> Value {
        match self {
            FieldType::Text => Value::String(String::new()),
            FieldType::Integer => Value::from(0),
            FieldType::Float => Value::from(0.0),
            FieldType::Boolean => Value::Bool(false),
            FieldType::Named(_) => Value::Null,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "Text"),
            FieldType::Integer => write!(f, "Integer"),
            FieldType::Float => write!(f, "Float"),
            FieldType::Boolean => write!(f, "Boolean"),
            FieldType::Named(name) => write!(f, "{}", name),
        }
    }
}

/// A single named, typed field within a shape
///
/// Non-writable fields are readable on the source side but never assigned on
/// the destination side (computed or read-only members).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    pub writable: bool,
}

/// Identity of a structural type plus its ordered field descriptors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeShape {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeShape {
    /// Start declaring a shape field by field
    pub fn builder(name: impl Into<String>) -> ShapeBuilder {
        ShapeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Infer a shape from a sample JSON object
    ///
    /// String fields become `Text`, integral numbers `Integer`, other numbers
    /// `Float`, booleans `Boolean`. Null, array, and object fields carry no
    /// usable type information and are rejected, as are non-object samples.
    /// Inferred fields are all writable.
    pub fn from_sample(name: impl Into<String>, sample: &Value) -> Result<TypeShape> {
        let name = name.into();
        let object = sample.as_object().ok_or_else(|| Error::ShapeInference {
            type_name: name.clone(),
            message: format!("sample must be an object, got {}", json_kind(sample)),
        })?;

        let mut fields = Vec::with_capacity(object.len());
        for (field, value) in object {
            let field_type = match value {
                Value::String(_) => FieldType::Text,
                Value::Bool(_) => FieldType::Boolean,
                Value::Number(n) if n.is_i64() || n.is_u64() => FieldType::Integer,
                Value::Number(_) => FieldType::Float,
                other => {
                    return Err(Error::ShapeInference {
                        type_name: name,
                        message: format!(
                            "field '{}' has no inferable type ({})",
                            field,
                            json_kind(other)
                        ),
                    });
                }
            };
            fields.push(FieldDescriptor {
                name: field.clone(),
                field_type,
                writable: true,
            });
        }

        Ok(TypeShape { name, fields })
    }

    /// The type name identifying this shape
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The writable fields, in declaration order
    pub fn writable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.writable)
    }
}

/// Fluent builder for declaring a [`TypeShape`]
pub struct ShapeBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl ShapeBuilder {
    /// Add a readable, writable field
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            field_type,
            writable: true,
        });
        self
    }

    /// Add a field that can be read from but never assigned to
    pub fn read_only(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            field_type,
            writable: false,
        });
        self
    }

    /// Finish the shape, rejecting duplicate field names
    pub fn build(self) -> Result<TypeShape> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(Error::DuplicateField {
                    type_name: self.name,
                    field: field.name.clone(),
                });
            }
        }
        Ok(TypeShape {
            name: self.name,
            fields: self.fields,
        })
    }
}

/// Order-sensitive identity of a (source type, destination type) pairing
///
/// Used as the transform-cache key and the key under which specific rule
/// tables are committed. `(S, D)` and `(D, S)` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypePair {
    pub source: String,
    pub dest: String,
}

impl TypePair {
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        TypePair {
            source: source.into(),
            dest: dest.into(),
        }
    }
}

impl fmt::Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
