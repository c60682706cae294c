//! Built-in conversion rules for common cases
//!
//! This module provides pre-configured [`MappingRule`]s for the conversions
//! that show up in nearly every mapping setup: scalar-to-text renderings,
//! text parsing, and date formatting. Date rules use the `Date` named type,
//! whose values are carried as ISO `YYYY-MM-DD` strings.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use serde_json::Value;

use crate::shape::FieldType;

use super::rules::MappingRule;

const ISO_DATE: &str = "%Y-%m-%d";

/// Render an integer field as text
pub fn integer_to_text() -> MappingRule {
    MappingRule::new(FieldType::Integer, FieldType::Text, |value| {
        let number = value
            .as_i64()
            .ok_or_else(|| anyhow!("expected an integer, got {}", value))?;
        Ok(Value::String(number.to_string()))
    })
}

/// Render a floating-point field as text
pub fn float_to_text() -> MappingRule {
    MappingRule::new(FieldType::Float, FieldType::Text, |value| {
        let number = value
            .as_f64()
            .ok_or_else(|| anyhow!("expected a number, got {}", value))?;
        Ok(Value::String(number.to_string()))
    })
}

/// Render a boolean field as text
pub fn boolean_to_text() -> MappingRule {
    MappingRule::new(FieldType::Boolean, FieldType::Text, |value| {
        let flag = value
            .as_bool()
            .ok_or_else(|| anyhow!("expected a boolean, got {}", value))?;
        Ok(Value::String(flag.to_string()))
    })
}

/// Parse a text field into an integer
pub fn text_to_integer() -> MappingRule {
    MappingRule::new(FieldType::Text, FieldType::Integer, |value| {
        let text = value
            .as_str()
            .ok_or_else(|| anyhow!("expected text, got {}", value))?;
        let number: i64 = text
            .trim()
            .parse()
            .with_context(|| format!("'{}' is not an integer", text))?;
        Ok(Value::from(number))
    })
}

/// Parse a text field into a floating-point number
pub fn text_to_float() -> MappingRule {
    MappingRule::new(FieldType::Text, FieldType::Float, |value| {
        let text = value
            .as_str()
            .ok_or_else(|| anyhow!("expected text, got {}", value))?;
        let number: f64 = text
            .trim()
            .parse()
            .with_context(|| format!("'{}' is not a number", text))?;
        Ok(Value::from(number))
    })
}

/// Format a `Date` field as text using a chrono format string
pub fn date_to_text(format: &str) -> MappingRule {
    let format = format.to_owned();
    MappingRule::new(FieldType::named("Date"), FieldType::Text, move |value| {
        let raw = value
            .as_str()
            .ok_or_else(|| anyhow!("expected a date string, got {}", value))?;
        let date = NaiveDate::parse_from_str(raw, ISO_DATE)
            .with_context(|| format!("'{}' is not an ISO date", raw))?;
        Ok(Value::String(date.format(&format).to_string()))
    })
}

/// Parse a text field into a `Date`, normalizing to the ISO carrier form
pub fn text_to_date(format: &str) -> MappingRule {
    let format = format.to_owned();
    MappingRule::new(FieldType::Text, FieldType::named("Date"), move |value| {
        let raw = value
            .as_str()
            .ok_or_else(|| anyhow!("expected text, got {}", value))?;
        let date = NaiveDate::parse_from_str(raw, &format)
            .with_context(|| format!("'{}' does not match '{}'", raw, format))?;
        Ok(Value::String(date.format(ISO_DATE).to_string()))
    })
}
