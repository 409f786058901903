//! Query state and the filtering pipeline.
//!
//! [`QueryState`] holds the user-driven inputs: search text, discrete filter
//! selections, a date range and a sort. [`QueryState::apply`] runs the
//! pipeline over a record slice. Every stage narrows the previous stage's
//! output:
//!
//! ```text
//! search  ->  discrete filters  ->  date range  ->  sort
//! ```
//!
//! The pipeline is a pure function of the state, the config and the records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{FilterConfig, ALL};
use crate::date::{record_timestamp, DateRange};
use crate::matching::{matches_filter, matches_search};
use crate::ordering::SortSpec;
use crate::path::FieldPath;
use crate::record::Filterable;
use crate::value::Timestamp;

/// Returns `true` for filter values that mean "no filter".
pub fn is_unset(value: &str) -> bool {
    value.is_empty() || value == ALL
}

/// Mutable query inputs.
///
/// Search has two forms: the raw text as typed, and the debounced text the
/// pipeline actually uses. Owners that don't debounce can set both at once
/// with [`set_search`](Self::set_search).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    search_text: String,
    debounced_search: String,
    filters: BTreeMap<String, String>,
    date_range: DateRange,
    sort: Option<SortSpec>,
}

impl QueryState {
    /// Creates an empty state, which matches every record.
    pub fn new() -> Self {
        QueryState::default()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Search text as typed.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Search text as applied.
    pub fn debounced_search(&self) -> &str {
        &self.debounced_search
    }

    /// Active filter selections, keyed by field path.
    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Selected value of one filter.
    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    pub fn date_range(&self) -> &DateRange {
        &self.date_range
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Updates the raw search text only.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Updates the applied search text only.
    pub fn set_debounced_search(&mut self, text: impl Into<String>) {
        self.debounced_search = text.into();
    }

    /// Updates raw and applied search text together.
    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.debounced_search.clone_from(&text);
        self.search_text = text;
    }

    /// Selects a value for one filter. `"all"` or `""` removes the filter.
    ///
    /// Returns `true` if the state changed.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();
        if is_unset(&value) {
            return self.filters.remove(&key).is_some();
        }
        self.filters.insert(key, value.clone()) != Some(value)
    }

    /// Removes one filter. Returns `true` if it was set.
    pub fn clear_filter(&mut self, key: &str) -> bool {
        self.filters.remove(key).is_some()
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Resets every input in one step.
    pub fn clear(&mut self) {
        *self = QueryState::default();
    }

    // ========================================================================
    // Derived state
    // ========================================================================

    /// Number of active conditions shown on the filter badge: one per
    /// selected filter plus one for the date range. Search is not counted.
    pub fn active_filter_count(&self) -> usize {
        let selected = self.filters.values().filter(|v| !is_unset(v)).count();
        selected + usize::from(self.date_range.is_active())
    }

    /// Returns `true` if any search, filter or date condition is active.
    pub fn has_filters(&self) -> bool {
        self.active_filter_count() > 0 || !self.search_needle().is_empty()
    }

    /// Snapshot of the applied state, for callers to display or persist.
    pub fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot {
            search: self.debounced_search.clone(),
            filters: self.filters.clone(),
            date_range: self.date_range.clone(),
            sort: self.sort.clone(),
        }
    }

    /// Rebuilds state from a snapshot. Unset filter values are dropped.
    pub fn restore(snapshot: QuerySnapshot) -> Self {
        let mut filters = snapshot.filters;
        filters.retain(|_, value| !is_unset(value));
        QueryState {
            search_text: snapshot.search.clone(),
            debounced_search: snapshot.search,
            filters,
            date_range: DateRange::new(
                snapshot.date_range.from.as_deref(),
                snapshot.date_range.to.as_deref(),
            ),
            sort: snapshot.sort,
        }
    }

    fn search_needle(&self) -> String {
        self.debounced_search.to_lowercase()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Runs the full pipeline, returning references in result order.
    pub fn apply<'a, T: Filterable>(&self, config: &FilterConfig, records: &'a [T]) -> Vec<&'a T> {
        let predicate = Predicate::new(self, config);
        let mut results: Vec<&'a T> = records
            .iter()
            .filter(|record| predicate.matches(*record))
            .collect();

        if let Some(sort) = &self.sort {
            sort.sort(&mut results);
        }
        results
    }

    /// Tests one record against the search, filter and date stages.
    pub fn matches<T: Filterable + ?Sized>(&self, config: &FilterConfig, record: &T) -> bool {
        Predicate::new(self, config).matches(record)
    }

    /// Counts matching records without sorting.
    pub fn count<T: Filterable>(&self, config: &FilterConfig, records: &[T]) -> usize {
        let predicate = Predicate::new(self, config);
        records.iter().filter(|record| predicate.matches(*record)).count()
    }
}

/// The filter stages with their inputs normalized once per run.
struct Predicate<'q> {
    needle: String,
    search_fields: &'q [FieldPath],
    filters: Vec<(FieldPath, String)>,
    date: DateStage<'q>,
}

enum DateStage<'q> {
    Off,
    Window {
        from: Timestamp,
        to: Timestamp,
        fields: &'q [FieldPath],
    },
    // A bound that doesn't parse admits nothing.
    Reject,
}

impl<'q> Predicate<'q> {
    fn new(state: &'q QueryState, config: &'q FilterConfig) -> Self {
        let filters = state
            .filters
            .iter()
            .filter(|(_, value)| !is_unset(value))
            .map(|(key, value)| (FieldPath::new(key.as_str()), value.to_lowercase()))
            .collect();

        let date = if !state.date_range.is_active() {
            DateStage::Off
        } else {
            match state.date_range.window() {
                Some((from, to)) => DateStage::Window {
                    from,
                    to,
                    fields: &config.date_fields,
                },
                None => DateStage::Reject,
            }
        };

        Predicate {
            needle: state.search_needle(),
            search_fields: &config.searchable_fields,
            filters,
            date,
        }
    }

    fn matches<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        self.matches_search(record) && self.matches_filters(record) && self.matches_date(record)
    }

    fn matches_search<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        // No searchable fields means search is switched off.
        if self.needle.is_empty() || self.search_fields.is_empty() {
            return true;
        }
        self.search_fields
            .iter()
            .any(|field| matches_search(&record.field_value(field), &self.needle))
    }

    fn matches_filters<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        self.filters
            .iter()
            .all(|(field, wanted)| matches_filter(&record.field_value(field), wanted))
    }

    fn matches_date<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        match &self.date {
            DateStage::Off => true,
            DateStage::Reject => false,
            DateStage::Window { from, to, fields } => record_timestamp(record, fields)
                .is_some_and(|ts| *from <= ts && ts <= *to),
        }
    }
}

/// The applied query state as handed to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySnapshot {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub sort: Option<SortSpec>,
}

impl QuerySnapshot {
    /// Same count as [`QueryState::active_filter_count`].
    pub fn active_filter_count(&self) -> usize {
        let selected = self.filters.values().filter(|v| !is_unset(v)).count();
        let dated = DateRange::new(self.date_range.from.as_deref(), self.date_range.to.as_deref());
        selected + usize::from(dated.is_active())
    }

    /// Returns `true` if any search, filter or date condition is active.
    pub fn has_filters(&self) -> bool {
        self.active_filter_count() > 0 || !self.search.is_empty()
    }
}
