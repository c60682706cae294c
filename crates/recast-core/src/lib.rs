//! Recast Core - rule-driven mapping between structural value shapes
//!
//! This crate transforms a value of one structural type into a value of
//! another: matching fields are copied, diverging fields are converted by
//! caller-supplied or globally registered rules, and the synthesized
//! transform for each type pair is cached so repeated mappings pay the
//! shape-analysis cost only once.
//!
//! # Main Components
//!
//! - **Shapes**: field-descriptor tables describing a type's mappable fields
//! - **Rules**: conversion functions with declared type signatures, bound to
//!   a field (specific) or to a type pair (global)
//! - **Synthesis**: per-field resolution of the applicable rule source into
//!   one reusable transform
//! - **Caching**: at most one synthesis per type pair, even under concurrent
//!   first use
//!
//! # Example
//!
//! ```
//! use recast_core::{FieldType, Mapper, TypeShape};
//! use serde_json::json;
//!
//! fn main() -> recast_core::Result<()> {
//!     let mapper = Mapper::new();
//!     mapper.register_shape(
//!         TypeShape::builder("Order")
//!             .field("Id", FieldType::Integer)
//!             .field("Total", FieldType::Float)
//!             .build()?,
//!     )?;
//!     mapper.register_shape(
//!         TypeShape::builder("OrderView")
//!             .field("Id", FieldType::Integer)
//!             .field("Total", FieldType::Float)
//!             .build()?,
//!     )?;
//!
//!     let view = mapper.map(&json!({"Id": 7, "Total": 12.5}), "Order", "OrderView")?;
//!     assert_eq!(view["Total"], json!(12.5));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod mapping;
pub mod shape;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use mapping::{
    built_in, CompiledTransform, GlobalRuleBuilder, GlobalRuleSet, MappedValues, Mapper,
    MappingRule, TransformBuilder,
};
pub use shape::{FieldDescriptor, FieldType, ShapeBuilder, TypePair, TypeShape};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
