//! Per-value predicates for the search and discrete-filter stages.
//!
//! Both stages compare case-insensitively on the value's text form, but they
//! treat lists differently:
//!
//! | value  | search                    | discrete filter            |
//! |--------|---------------------------|----------------------------|
//! | scalar | substring                 | full equality              |
//! | list   | any element, substring    | any element, substring     |
//!
//! So `{tier: "gold"}` is not selected by the filter value `gol`, while
//! `{specialization: ["Commercial"]}` is selected by `comm`. Existing filter
//! option sets rely on that asymmetry.

use crate::value::Value;

/// Free-text search against one resolved value.
///
/// `needle` must already be lowercased.
pub fn matches_search(value: &Value<'_>, needle: &str) -> bool {
    match value {
        Value::List(items) => items.iter().any(|item| contains_folded(item, needle)),
        other => contains_folded(other, needle),
    }
}

/// Discrete filter against one resolved value.
///
/// `wanted` must already be lowercased.
pub fn matches_filter(value: &Value<'_>, wanted: &str) -> bool {
    match value {
        Value::List(items) => items.iter().any(|item| contains_folded(item, wanted)),
        other => other
            .to_text()
            .is_some_and(|text| text.to_lowercase() == wanted),
    }
}

fn contains_folded(value: &Value<'_>, needle: &str) -> bool {
    value
        .to_text()
        .is_some_and(|text| text.to_lowercase().contains(needle))
}
