//! Edge cases across the public API.

use std::cmp::Ordering;

use serde_json::{json, Value as JsonValue};
use sifter::{
    compare_values, is_unset, parse_timestamp, record_timestamp, DateRange, FieldPath,
    FilterConfig, FilterSpec, FilterStats, Filterable, Number, QueryState, Record, ResultSet,
    SifterError, SortSpec, Timestamp, Value,
};

// ============================================================================
// Values and paths
// ============================================================================

#[test]
fn unresolvable_paths_are_absent() {
    let doc = json!({"a": {"b": [1, 2]}, "s": "text"});
    for path in ["x", "a.x", "a.b.x", "a.b.9", "s.len", "a.b.0.c"] {
        assert_eq!(
            doc.field_value(&FieldPath::new(path)),
            Value::None,
            "path {path}"
        );
    }
    assert_eq!(
        doc.field_value(&"a.b.1".into()),
        Value::Number(Number::I64(2))
    );
}

#[test]
fn record_maps_and_documents_agree() {
    let doc = json!({"owner": {"name": "Mia"}, "tags": ["x"]});
    let record: Record = doc.as_object().cloned().unwrap();
    for path in ["owner.name", "owner", "tags", "missing"] {
        let path = FieldPath::new(path);
        assert_eq!(doc.field_value(&path), record.field_value(&path));
    }
}

#[test]
fn float_fields_search_like_browser_text() {
    let records = vec![json!({"price": 250000.0}), json!({"price": 99.5})];
    let mut state = QueryState::new();
    state.set_search("250000");
    let config = FilterConfig::new().searchable(["price"]);
    assert_eq!(state.apply(&config, &records).len(), 1);

    // "250000.0" would only appear if floats kept their trailing zero
    state.set_search("250000.0");
    assert!(state.apply(&config, &records).is_empty());
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn mixed_type_sort_is_deterministic() {
    let records = vec![
        json!({"id": 1, "v": "b"}),
        json!({"id": 2, "v": 10}),
        json!({"id": 3}),
        json!({"id": 4, "v": true}),
        json!({"id": 5, "v": "a"}),
        json!({"id": 6, "v": 2.5}),
        json!({"id": 7, "v": ["list"]}),
    ];
    let mut state = QueryState::new();
    state.set_sort(Some(SortSpec::asc("v")));
    let ids: Vec<i64> = state
        .apply(&FilterConfig::default(), &records)
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![4, 6, 2, 5, 1, 7, 3]);

    state.set_sort(Some(SortSpec::desc("v")));
    let ids: Vec<i64> = state
        .apply(&FilterConfig::default(), &records)
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![7, 1, 5, 2, 6, 4, 3]);
}

#[test]
fn compare_values_is_antisymmetric() {
    let values = [
        Value::Bool(false),
        Value::Number(Number::F64(f64::NAN)),
        Value::Number(Number::U64(3)),
        Value::String(""),
        Value::Object,
        Value::None,
    ];
    for a in &values {
        for b in &values {
            assert_eq!(compare_values(a, b), compare_values(b, a).reverse());
        }
        assert_eq!(compare_values(a, a), Ordering::Equal);
    }
}

#[test]
fn clearing_sort_keeps_filtered_order() {
    let records = vec![json!({"n": 3}), json!({"n": 1}), json!({"n": 2})];
    let mut state = QueryState::new();
    state.set_sort(Some(SortSpec::asc("n")));
    state.set_sort(None);
    let ns: Vec<i64> = state
        .apply(&FilterConfig::default(), &records)
        .iter()
        .map(|r| r["n"].as_i64().unwrap())
        .collect();
    assert_eq!(ns, vec![3, 1, 2]);
}

// ============================================================================
// Dates
// ============================================================================

#[test]
fn numeric_dates_are_epoch_millis() {
    let fields = vec![FieldPath::new("createdAt")];
    let record = json!({"createdAt": 1_704_067_200_000i64});
    assert_eq!(
        record_timestamp(&record, &fields),
        Some(parse_timestamp("2024-01-01").unwrap())
    );
}

#[test]
fn custom_date_field_chain() {
    let records = vec![
        json!({"id": 1, "updatedAt": "2024-05-01", "createdAt": "2020-01-01"}),
        json!({"id": 2, "createdAt": "2024-05-02"}),
    ];
    let config = FilterConfig::new().date_fields(["updatedAt"]);
    let mut state = QueryState::new();
    state.set_date_range(DateRange::new(Some("2024-01-01"), None));
    let hits = state.apply(&config, &records);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"], json!(1));
}

#[test]
fn date_bound_with_time_is_exact() {
    let records = vec![
        json!({"createdAt": "2024-01-31T09:00:00Z"}),
        json!({"createdAt": "2024-01-31T18:00:00Z"}),
    ];
    let mut state = QueryState::new();
    state.set_date_range(DateRange::new(None, Some("2024-01-31T12:00:00Z")));
    assert_eq!(state.apply(&FilterConfig::default(), &records).len(), 1);
}

#[test]
fn invalid_date_error_carries_input() {
    let err = parse_timestamp("yesterday").unwrap_err();
    assert!(matches!(err, SifterError::InvalidDate(ref s) if s == "yesterday"));
    assert_eq!(err.to_string(), "invalid date: \"yesterday\"");
}

#[test]
fn timestamp_sentinels_bracket_everything() {
    let ts = parse_timestamp("1900-01-01").unwrap();
    assert!(Timestamp::MIN < ts);
    assert!(parse_timestamp("2100-01-01").unwrap() < Timestamp::MAX);
}

// ============================================================================
// Config and state
// ============================================================================

#[test]
fn unset_values() {
    assert!(is_unset(""));
    assert!(is_unset("all"));
    assert!(!is_unset("All"));
    assert!(!is_unset("active"));
}

#[test]
fn config_round_trips_through_json() {
    let config = FilterConfig::new()
        .searchable(["name"])
        .filter_spec(FilterSpec::new("kyc", "KYC").option("approved", "Approved"));
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(FilterConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn config_errors_are_typed() {
    assert!(matches!(
        FilterConfig::from_json_str("3"),
        Err(SifterError::Config(_))
    ));
    assert!(matches!(
        FilterConfig::from_yaml_str("debounce_ms: soon"),
        Err(SifterError::ConfigYaml(_))
    ));
}

#[test]
fn result_set_over_empty_source() {
    let records: Vec<JsonValue> = Vec::new();
    let mut state = QueryState::new();
    state.set_filter("status", "active");
    let result = ResultSet::compute(&state, &FilterConfig::default(), &records);
    assert!(result.is_empty());
    assert_eq!(result.stats(), FilterStats::new(0, 0, true));
    assert_eq!(result.stats().hidden(), 0);
}

#[test]
fn snapshot_serializes_for_persistence() {
    let mut state = QueryState::new();
    state.set_search("villa");
    state.set_filter("type", "rent");
    state.set_date_range(DateRange::new(Some("2024-01-01"), None));
    state.set_sort(Some(SortSpec::desc("price")));

    let value = serde_json::to_value(state.snapshot()).unwrap();
    assert_eq!(
        value,
        json!({
            "search": "villa",
            "filters": {"type": "rent"},
            "date_range": {"from": "2024-01-01"},
            "sort": {"field": "price", "dir": "desc"},
        })
    );
}
