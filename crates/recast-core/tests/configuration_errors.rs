//! Configuration-time failure scenarios: duplicate rules, ordering
//! violations, and unresolvable fields. Every failure here is fatal to the
//! triggering call and leaves nothing cached for the offending pair.


use recast_core::{built_in, Error, FieldType, MappingRule};
use serde_json::json;

fn passthrough(input: FieldType, output: FieldType) -> MappingRule {
    MappingRule::new(input, output, |value| Ok(value.clone()))
}

#[test]
fn test_rule_with_wrong_signature_fails_commit() {
    let mapper = test_support::mapper_with_shapes();

    // Gender maps Text -> Gender, but this rule declares Text -> Text
    let result = mapper
        .transform_builder("Customer", "CustomerView")
        .with_rule("BirthDate", built_in::date_to_text("%d/%m/%Y"))
        .unwrap()
        .with_rule("FirstOrderDate", built_in::text_to_date("%Y-%m-%d"))
        .unwrap()
        .with_rule("Gender", passthrough(FieldType::Text, FieldType::Text))
        .unwrap()
        .with_rule("MaritalStatus", test_support::marital_status_to_text())
        .unwrap()
        .commit();

    match result {
        Err(Error::RuleTypeMismatch { field, .. }) => assert_eq!(field, "Gender"),
        other => panic!("expected RuleTypeMismatch, got {:?}", other),
    }
    assert!(mapper.transform("Customer", "CustomerView").is_none());
}

#[test]
fn test_uncovered_divergent_field_fails_commit() {
    let mapper = test_support::mapper_with_shapes();

    // Gender has no rule at all, and no global table exists
    let result = mapper
        .transform_builder("Customer", "CustomerView")
        .with_rule("BirthDate", built_in::date_to_text("%d/%m/%Y"))
        .unwrap()
        .with_rule("FirstOrderDate", built_in::text_to_date("%Y-%m-%d"))
        .unwrap()
        .with_rule("MaritalStatus", test_support::marital_status_to_text())
        .unwrap()
        .commit();

    match result {
        Err(Error::NoApplicableRule {
            field,
            source_type,
            dest_type,
        }) => {
            assert_eq!(field, "Gender");
            assert_eq!(source_type, FieldType::Text);
            assert_eq!(dest_type, FieldType::named("Gender"));
        }
        other => panic!("expected NoApplicableRule, got {:?}", other),
    }

    // Synthesis is all-or-nothing: nothing was cached for the pair
    assert!(mapper.transform("Customer", "CustomerView").is_none());
}

#[test]
fn test_duplicate_specific_rule_is_rejected() {
    let mapper = test_support::mapper_with_shapes();

    let result = mapper
        .transform_builder("Customer", "CustomerView")
        .with_rule("BirthDate", built_in::date_to_text("%d/%m/%Y"))
        .unwrap()
        .with_rule("BirthDate", built_in::date_to_text("%Y-%m-%d"));

    assert!(matches!(result, Err(Error::DuplicateRule { .. })));
}

#[test]
fn test_committing_the_same_pair_twice_is_rejected() {
    let mapper = test_support::mapper_with_shapes();

    mapper
        .transform_builder("Purchase", "PurchaseView")
        .with_rule("PurchaseDate", built_in::date_to_text("%d/%m/%Y"))
        .unwrap()
        .with_rule("Amount", built_in::float_to_text())
        .unwrap()
        .commit()
        .unwrap();

    // The reverse pair is a distinct key and commits fine
    mapper
        .transform_builder("PurchaseView", "Purchase")
        .with_rule("PurchaseDate", built_in::text_to_date("%d/%m/%Y"))
        .unwrap()
        .with_rule("Amount", built_in::text_to_float())
        .unwrap()
        .commit()
        .unwrap();

    // A second table for the forward pair is not
    let result = mapper
        .transform_builder("Purchase", "PurchaseView")
        .with_rule("PurchaseDate", built_in::date_to_text("%Y-%m-%d"))
        .unwrap()
        .with_rule("Amount", built_in::float_to_text())
        .unwrap()
        .commit();

    assert!(matches!(result, Err(Error::ConfigurationOrder { .. })));
}

#[test]
fn test_duplicate_global_rule_is_rejected() {
    let mapper = test_support::mapper_with_shapes();

    let result = mapper
        .global_rules()
        .with_rule(built_in::date_to_text("%d/%m/%Y"))
        .unwrap()
        .with_rule(test_support::marital_status_to_text())
        .unwrap()
        // Same (Date, Text) pair as the first rule
        .with_rule(built_in::date_to_text("%Y-%m-%d"));

    assert!(matches!(result, Err(Error::DuplicateRule { .. })));
}

#[test]
fn test_duplicate_stringify_fallback_is_rejected() {
    let mapper = test_support::mapper_with_shapes();

    let result = mapper
        .global_rules()
        .with_rule(built_in::date_to_text("%d/%m/%Y"))
        .unwrap()
        .with_stringify_fallback()
        .unwrap()
        .with_stringify_fallback();

    assert!(matches!(result, Err(Error::DuplicateRule { .. })));
}

#[test]
fn test_second_global_commit_is_rejected() {
    let mapper = test_support::mapper_with_shapes();

    mapper
        .global_rules()
        .with_rule(built_in::date_to_text("%d/%m/%Y"))
        .unwrap()
        .with_stringify_fallback()
        .unwrap()
        .commit()
        .unwrap();

    let result = mapper
        .global_rules()
        .with_rule(built_in::date_to_text("%Y-%m-%d"))
        .unwrap()
        .commit();

    assert!(matches!(result, Err(Error::ConfigurationOrder { .. })));
}

#[test]
fn test_global_commit_after_specific_rules_is_rejected() {
    let mapper = test_support::mapper_with_shapes();

    mapper
        .transform_builder("Purchase", "PurchaseView")
        .with_rule("PurchaseDate", built_in::date_to_text("%d/%m/%Y"))
        .unwrap()
        .with_rule("Amount", built_in::float_to_text())
        .unwrap()
        .commit()
        .unwrap();

    let result = mapper
        .global_rules()
        .with_rule(built_in::date_to_text("%Y-%m-%d"))
        .unwrap()
        .commit();

    assert!(matches!(result, Err(Error::ConfigurationOrder { .. })));
}

#[test]
fn test_global_commit_after_implicit_mapping_is_rejected() {
    let mapper = test_support::mapper_with_shapes();

    // An implicit identity transform counts as synthesis activity
    mapper
        .map(&test_support::sample_customer(), "Customer", "Customer")
        .unwrap();

    let result = mapper.global_rules().commit();
    assert!(matches!(result, Err(Error::ConfigurationOrder { .. })));
}

#[test]
fn test_specific_commit_after_implicit_build_is_rejected() {
    let mapper = test_support::mapper_with_shapes();
    mapper
        .global_rules()
        .with_rule(built_in::date_to_text("%d/%m/%Y"))
        .unwrap()
        .with_rule(built_in::text_to_date("%Y-%m-%d"))
        .unwrap()
        .with_rule(test_support::gender_rule())
        .unwrap()
        .with_stringify_fallback()
        .unwrap()
        .commit()
        .unwrap();

    // First map implicitly builds Customer -> CustomerView
    mapper
        .map(&test_support::sample_customer(), "Customer", "CustomerView")
        .unwrap();

    let result = mapper
        .transform_builder("Customer", "CustomerView")
        .with_rule("BirthDate", built_in::date_to_text("%Y-%m-%d"))
        .unwrap()
        .commit();

    assert!(matches!(result, Err(Error::ConfigurationOrder { .. })));
}

#[test]
fn test_reset_isolates_scenarios() {
    let mapper = test_support::mapper_with_shapes();

    mapper
        .global_rules()
        .with_stringify_fallback()
        .unwrap()
        .commit()
        .unwrap();
    mapper
        .map(&test_support::sample_purchase(), "Purchase", "PurchaseView")
        .unwrap();

    mapper.reset();

    // Both the global set and the cache are gone; a fresh scenario starts clean
    mapper
        .global_rules()
        .with_rule(built_in::date_to_text("%d/%m/%Y"))
        .unwrap()
        .commit()
        .unwrap();
    assert!(mapper.transform("Purchase", "PurchaseView").is_none());
}

#[test]
fn test_mapping_unregistered_types_is_reported() {
    let mapper = recast_core::Mapper::new();
    let result = mapper.map(&json!({"Id": 1}), "Ghost", "GhostView");
    assert!(matches!(result, Err(Error::UnknownShape { .. })));
}

#[test]
fn test_non_object_source_is_reported() {
    let mapper = test_support::mapper_with_shapes();
    let result = mapper.map(&json!(42), "Customer", "Customer");
    match result {
        Err(Error::SourceNotObject { type_name, actual }) => {
            assert_eq!(type_name, "Customer");
            assert_eq!(actual, "number");
        }
        other => panic!("expected SourceNotObject, got {:?}", other),
    }
}

#[test]
fn test_unused_specific_rules_are_ignored() {
    let mapper = test_support::mapper_with_shapes();

    // "Nickname" exists on neither side; the rule simply never binds
    mapper
        .transform_builder("Purchase", "PurchaseView")
        .with_rule("PurchaseDate", built_in::date_to_text("%d/%m/%Y"))
        .unwrap()
        .with_rule("Amount", built_in::float_to_text())
        .unwrap()
        .with_rule("Nickname", passthrough(FieldType::Text, FieldType::Text))
        .unwrap()
        .commit()
        .unwrap();

    let view = mapper
        .map(&test_support::sample_purchase(), "Purchase", "PurchaseView")
        .unwrap();
    assert_eq!(view["Amount"], json!("125.75"));
    assert!(view.get("Nickname").is_none());
}

#[test]
fn test_stringify_does_not_cover_non_text_destinations() {
    let mapper = test_support::mapper_with_shapes();
    mapper
        .global_rules()
        .with_stringify_fallback()
        .unwrap()
        .commit()
        .unwrap();

    // PurchaseView -> Purchase needs Text -> Date and Text -> Float; the
    // fallback only targets textual destinations, so synthesis fails.
    let view = json!({
        "Id": 301,
        "CustomerId": 8,
        "PurchaseDate": "17/03/2023",
        "Amount": "125.75",
        "Currency": "EUR"
    });
    let result = mapper.map(&view, "PurchaseView", "Purchase");

    match result {
        Err(Error::NoApplicableRule { field, .. }) => {
            assert!(field == "PurchaseDate" || field == "Amount");
        }
        other => panic!("expected NoApplicableRule, got {:?}", other),
    }
    assert!(mapper.transform("PurchaseView", "Purchase").is_none());
}

#[test]
fn test_error_values_render_diagnosable_messages() {
    let mapper = test_support::mapper_with_shapes();

    // Amount (Float -> Text) is left uncovered
    let err = mapper
        .transform_builder("Purchase", "PurchaseView")
        .with_rule("PurchaseDate", built_in::date_to_text("%d/%m/%Y"))
        .unwrap()
        .commit()
        .unwrap_err();

    let rendered = err.to_string();
    assert!(rendered.contains("Amount"));
    assert!(rendered.contains("Float"));
    assert!(rendered.contains("Text"));
}
