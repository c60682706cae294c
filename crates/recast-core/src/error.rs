//! Error types for the Recast core library
//!
//! This module defines the error surface for Recast, using thiserror for
//! ergonomic error definitions and anyhow for flexible rule error contexts.

use thiserror::Error;

use crate::shape::FieldType;

/// Main error type for Recast operations
#[derive(Error, Debug)]
pub enum Error {
    /// A rule was registered twice for the same key before commit
    #[error("Duplicate rule: {message}")]
    DuplicateRule { message: String },

    /// Configuration arrived after the point where it can take effect
    #[error("Configuration order violation: {message}")]
    ConfigurationOrder { message: String },

    /// A rule's declared signature does not fit the field it is bound to
    #[error("Rule type mismatch on field '{field}': rule converts {declared_input} to {declared_output}, field requires {source_type} to {dest_type}")]
    RuleTypeMismatch {
        field: String,
        declared_input: FieldType,
        declared_output: FieldType,
        source_type: FieldType,
        dest_type: FieldType,
    },

    /// A matched field diverges in type and no rule resolves it
    #[error("No applicable rule for field '{field}': cannot convert {source_type} to {dest_type}")]
    NoApplicableRule {
        field: String,
        source_type: FieldType,
        dest_type: FieldType,
    },

    /// A shape is already registered under the same type name
    #[error("Shape '{type_name}' is already registered")]
    DuplicateShape { type_name: String },

    /// A shape declares the same field name twice
    #[error("Shape '{type_name}' declares field '{field}' more than once")]
    DuplicateField { type_name: String, field: String },

    /// A shape could not be inferred from a sample value
    #[error("Cannot infer shape '{type_name}': {message}")]
    ShapeInference { type_name: String, message: String },

    /// A mapping request referenced a type name with no registered shape
    #[error("No shape registered for type '{type_name}'")]
    UnknownShape { type_name: String },

    /// A transform was applied to a value that is not a JSON object
    #[error("Source value for '{type_name}' must be an object, got {actual}")]
    SourceNotObject { type_name: String, actual: String },

    /// A conversion rule failed while a transform was being applied
    #[error("Rule for field '{field}' failed: {source}")]
    RuleApplication {
        field: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;
