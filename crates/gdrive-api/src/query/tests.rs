//! Tests for filter validation and compilation.

use chrono::{NaiveDate, TimeZone, Utc};

use super::*;

fn validator() -> FilterValidator {
    FilterValidator::new(FieldRegistry::drive())
}

fn strict() -> FilterValidator {
    validator().with_mode(ParseMode::Strict)
}

fn compile_one(key: &str, value: &str) -> QueryResult<CompiledQuery> {
    compile(&validator(), &RawFilterInput::new().with(key, value))
}

/// A well-formed sample value for a field.
fn sample_value(spec: &FieldSpec) -> &'static str {
    match spec.kind() {
        ValueKind::Timestamp => "2012-06-04T12:00:00",
        ValueKind::Text => "sample",
    }
}

fn key_for(field: &str, operator: OperatorKind) -> String {
    match operator.token() {
        Some(token) => format!("{field}_{token}"),
        None => field.to_string(),
    }
}

// ==================== Concrete Scenarios ====================

#[test]
fn test_title_contains_blue() {
    let input = RawFilterInput::new().with("title_contains", "blue");
    let tokens = validator().validate(&input).unwrap();

    assert_eq!(
        tokens,
        vec![FilterToken::new(
            "title",
            OperatorKind::Contains,
            FilterValue::Scalar("blue".to_string())
        )]
    );
    assert_eq!(
        QueryCompiler::compile(&tokens).unwrap().as_str(),
        "title contains 'blue'"
    );
}

#[test]
fn test_full_text_equality_is_unsupported() {
    let err = validator()
        .validate(&RawFilterInput::new().with("fullText", "blue"))
        .unwrap_err();
    assert_eq!(
        err,
        QueryError::UnsupportedOperator {
            field: "fullText".to_string(),
            operator: OperatorKind::Equals,
        }
    );
}

#[test]
fn test_parents_in() {
    assert_eq!(compile_one("parents_in", "F123").unwrap().as_str(), "'F123' in parents");
}

#[test]
fn test_bare_key_defaults_to_equals() {
    assert_eq!(compile_one("title", "notes").unwrap().as_str(), "title = 'notes'");
}

// ==================== Registry-wide Properties ====================

#[test]
fn test_every_allowed_pair_compiles_with_symbol() {
    let registry = FieldRegistry::drive();
    for spec in registry.iter() {
        for &operator in spec.operators() {
            let key = key_for(spec.name(), operator);
            let query = compile_one(&key, sample_value(spec))
                .unwrap_or_else(|e| panic!("{key} failed: {e}"));
            let query = query.as_str();

            assert!(query.contains(spec.name()), "{query} lacks field");
            match operator {
                OperatorKind::In => {
                    assert!(query.contains(" in "), "{query} lacks 'in'");
                    assert!(query.ends_with(spec.name()));
                }
                op => assert!(
                    query.contains(&format!(" {} ", op.symbol())),
                    "{query} lacks '{}'",
                    op.symbol()
                ),
            }
        }
    }
}

#[test]
fn test_every_disallowed_pair_is_rejected() {
    let registry = FieldRegistry::drive();
    for spec in registry.iter() {
        for operator in OperatorKind::ALL {
            if spec.allows(operator) {
                continue;
            }
            let key = key_for(spec.name(), operator);
            let err = validator()
                .validate(&RawFilterInput::new().with(key.as_str(), sample_value(spec)))
                .unwrap_err();
            assert_eq!(
                err,
                QueryError::unsupported_operator(spec.name(), operator),
                "{key} should be unsupported"
            );
        }
    }
}

#[test]
fn test_unsupported_operator_raised_in_strict_mode_too() {
    let err = strict()
        .validate(&RawFilterInput::new().with("parents", "F123"))
        .unwrap_err();
    assert!(matches!(err, QueryError::UnsupportedOperator { .. }));
}

// ==================== Idempotence & Ordering ====================

#[test]
fn test_compile_is_idempotent() {
    let input = RawFilterInput::new()
        .with("title_contains", "tax")
        .with("modifiedDate_gte", "2020-01-01")
        .with("trashed", "false");
    let tokens = validator().validate(&input).unwrap();

    let first = QueryCompiler::compile(&tokens).unwrap();
    let second = QueryCompiler::compile(&tokens).unwrap();
    assert_eq!(first.as_str().as_bytes(), second.as_str().as_bytes());
}

#[test]
fn test_token_order_follows_input_order() {
    let input = RawFilterInput::new()
        .with("trashed", "false")
        .with("title_contains", "tax")
        .with("starred", "true");
    let query = compile(&validator(), &input).unwrap();
    assert_eq!(
        query.as_str(),
        "trashed = 'false' and title contains 'tax' and starred = 'true'"
    );
}

// ==================== Value Shaping ====================

#[test]
fn test_multi_word_value_stays_one_conjunct() {
    let input = RawFilterInput::new().with("title", "Grad School");
    let tokens = validator().validate(&input).unwrap();

    assert_eq!(
        tokens[0].value,
        FilterValue::WordSequence(vec!["Grad".to_string(), "School".to_string()])
    );
    let query = QueryCompiler::compile(&tokens).unwrap();
    assert_eq!(query.as_str(), "title = 'Grad School'");
    assert!(!query.as_str().contains(" and "));
}

#[test]
fn test_multi_word_value_collapses_whitespace() {
    let query = compile_one("title_contains", "Grad   School\tNotes").unwrap();
    assert_eq!(query.as_str(), "title contains 'Grad School Notes'");
}

#[test]
fn test_single_quote_in_value_rejected() {
    let err = compile_one("title", "Bob's files").unwrap_err();
    assert!(matches!(
        err,
        QueryError::InvalidValue { ref field, ref value, .. }
            if field == "title" && value == "Bob's files"
    ));
}

#[test]
fn test_backslash_in_value_rejected() {
    // A trailing backslash would escape the closing quote and swallow the
    // conjunction that follows.
    let input = RawFilterInput::new()
        .with("title_contains", "dir\\")
        .with("trashed", "false");
    let err = compile(&validator(), &input).unwrap_err();
    assert!(matches!(
        err,
        QueryError::InvalidValue { ref field, ref value, .. }
            if field == "title" && value == "dir\\"
    ));

    let err = compile_one("title", "a\\b").unwrap_err();
    assert!(matches!(err, QueryError::InvalidValue { .. }));
}

#[test]
fn test_scalar_value_is_trimmed() {
    let query = compile_one("title", " Photos ").unwrap();
    assert_eq!(query.as_str(), "title = 'Photos'");
}

// ==================== Timestamps ====================

#[test]
fn test_range_composition() {
    let input = RawFilterInput::new()
        .with("modifiedDate_gt", "2012-06-04T12:00:00")
        .with("modifiedDate_lt", "2012-07-04T12:00:00");
    let query = compile(&validator(), &input).unwrap();
    assert_eq!(
        query.as_str(),
        "modifiedDate > '2012-06-04T12:00:00+00:00' and modifiedDate < '2012-07-04T12:00:00+00:00'"
    );
}

#[test]
fn test_naive_datetime_value_localized_to_utc() {
    let naive = NaiveDate::from_ymd_opt(2012, 6, 4)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let input = RawFilterInput::new().with("lastViewedByMeDate_lte", naive);
    let query = compile(&validator(), &input).unwrap();
    assert_eq!(
        query.as_str(),
        "lastViewedByMeDate <= '2012-06-04T09:30:00+00:00'"
    );
}

#[test]
fn test_zoned_text_converted_to_utc() {
    let query = compile_one("modifiedDate_gte", "2012-06-04T12:00:00-05:00").unwrap();
    assert_eq!(query.as_str(), "modifiedDate >= '2012-06-04T17:00:00+00:00'");
}

#[test]
fn test_instant_value_used_as_is() {
    let instant = Utc.with_ymd_and_hms(2020, 2, 29, 23, 59, 59).unwrap();
    let input = RawFilterInput::new().with("modifiedDate", instant);
    let query = compile(&validator(), &input).unwrap();
    assert_eq!(query.as_str(), "modifiedDate = '2020-02-29T23:59:59+00:00'");
}

#[test]
fn test_unparseable_timestamp_rejected() {
    let err = compile_one("modifiedDate_gt", "last tuesday").unwrap_err();
    assert!(matches!(
        err,
        QueryError::InvalidValue { ref field, .. } if field == "modifiedDate"
    ));
}

#[test]
fn test_timestamp_is_scalar() {
    let tokens = validator()
        .validate(&RawFilterInput::new().with("modifiedDate", "2012-06-04 08:00:00"))
        .unwrap();
    assert_eq!(
        tokens[0].value,
        FilterValue::Scalar("2012-06-04T08:00:00+00:00".to_string())
    );
}

#[test]
fn test_fractional_seconds_truncated() {
    let query = compile_one("modifiedDate_gt", "2012-06-04 12:00:00.500").unwrap();
    assert_eq!(query.as_str(), "modifiedDate > '2012-06-04T12:00:00+00:00'");

    let naive = NaiveDate::from_ymd_opt(2012, 6, 4)
        .unwrap()
        .and_hms_milli_opt(12, 0, 0, 250)
        .unwrap();
    let input = RawFilterInput::new().with("modifiedDate_lt", naive);
    let query = compile(&validator(), &input).unwrap();
    assert_eq!(query.as_str(), "modifiedDate < '2012-06-04T12:00:00+00:00'");
}

// ==================== Folder Queries ====================

#[test]
fn test_folder_query_ends_with_folder_conjunct() {
    let input = RawFilterInput::new().with("title", "Grad School");
    let query = compile_folders(&validator(), &input).unwrap();
    assert_eq!(
        query.as_str(),
        "title = 'Grad School' and mimeType = 'application/vnd.google-apps.folder'"
    );
}

#[test]
fn test_file_query_never_has_folder_conjunct() {
    let input = RawFilterInput::new().with("title", "Grad School");
    let query = compile(&validator(), &input).unwrap();
    assert!(!query.as_str().contains(FOLDER_MIME_TYPE));
}

// ==================== Parse Modes ====================

#[test]
fn test_lenient_mode_skips_unknown_and_malformed_keys() {
    let input = RawFilterInput::new()
        .with("colour", "blue")
        .with("title contains", "x")
        .with("title_", "x")
        .with("title_contains", "blue");
    let tokens = validator().validate(&input).unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].field, "title");
}

#[test]
fn test_lenient_mode_all_skipped_gives_empty_query() {
    let input = RawFilterInput::new().with("colour", "blue");
    let query = compile(&validator(), &input).unwrap();
    assert!(query.is_empty());
}

#[test]
fn test_strict_mode_rejects_unknown_field() {
    let err = strict()
        .validate(&RawFilterInput::new().with("colour", "blue"))
        .unwrap_err();
    assert!(matches!(err, QueryError::UnknownField { ref field, .. } if field == "colour"));
}

#[test]
fn test_strict_mode_rejects_malformed_key() {
    let err = strict()
        .validate(&RawFilterInput::new().with("title=", "blue"))
        .unwrap_err();
    assert_eq!(err, QueryError::malformed_key("title="));
}

#[test]
fn test_no_partial_results_on_failure() {
    let input = RawFilterInput::new()
        .with("title_contains", "ok")
        .with("fullText", "bad");
    assert!(validator().validate(&input).is_err());
}

// ==================== Isolated Registries ====================

#[test]
fn test_custom_registry_in_isolation() {
    let registry = FieldRegistry::builder()
        .field(FieldSpec::new("name", [OperatorKind::Contains]))
        .field(FieldSpec::timestamp("createdTime"))
        .build()
        .unwrap();
    let validator = FilterValidator::new(registry).with_mode(ParseMode::Strict);

    let input = RawFilterInput::new()
        .with("name_contains", "blue")
        .with("createdTime_gt", "2024-01-01");
    let query = compile(&validator, &input).unwrap();
    assert_eq!(
        query.as_str(),
        "name contains 'blue' and createdTime > '2024-01-01T00:00:00+00:00'"
    );

    // Drive fields are unknown to this registry.
    assert!(validator
        .validate(&RawFilterInput::new().with("title", "x"))
        .is_err());
}

#[test]
fn test_validator_is_shareable_across_threads() {
    let validator = std::sync::Arc::new(validator());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validator = std::sync::Arc::clone(&validator);
            std::thread::spawn(move || {
                let input = RawFilterInput::new().with("title_contains", format!("part{i}"));
                compile(&validator, &input).unwrap().into_string()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("title contains 'part{i}'"));
    }
}
