//! Filtered results and the counts shown next to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;
use crate::query::{QuerySnapshot, QueryState};
use crate::record::Filterable;

/// The filtered, sorted projection of a record collection.
///
/// Borrows from the source records; it is recomputed rather than updated.
#[derive(Debug)]
pub struct ResultSet<'a, T> {
    records: Vec<&'a T>,
    total: usize,
    active_filter_count: usize,
    has_filters: bool,
}

impl<'a, T: Filterable> ResultSet<'a, T> {
    /// Runs the pipeline for `state` over `records`.
    pub fn compute(state: &QueryState, config: &FilterConfig, records: &'a [T]) -> Self {
        ResultSet {
            records: state.apply(config, records),
            total: records.len(),
            active_filter_count: state.active_filter_count(),
            has_filters: state.has_filters(),
        }
    }
}

impl<'a, T> ResultSet<'a, T> {
    /// Matching records in result order.
    pub fn records(&self) -> &[&'a T] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.records.iter().copied()
    }

    pub fn into_records(self) -> Vec<&'a T> {
        self.records
    }

    /// Number of matching records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Size of the source collection.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Filter badge count: selected filters plus one for a date range.
    pub fn active_filter_count(&self) -> usize {
        self.active_filter_count
    }

    pub fn has_filters(&self) -> bool {
        self.has_filters
    }

    pub fn stats(&self) -> FilterStats {
        FilterStats::new(self.total, self.records.len(), self.has_filters)
    }
}

impl<'a, T: Clone> ResultSet<'a, T> {
    /// Clones the matching records out of the source.
    pub fn to_owned_records(&self) -> Vec<T> {
        self.records.iter().map(|r| (*r).clone()).collect()
    }
}

/// Summary counts, as in "12 of 340 shown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    pub total: usize,
    pub filtered: usize,
    pub has_filters: bool,
}

impl FilterStats {
    pub fn new(total: usize, filtered: usize, has_filters: bool) -> Self {
        FilterStats {
            total,
            filtered,
            has_filters,
        }
    }

    /// Computes stats from the two collection sizes and the query snapshot.
    pub fn from_snapshot(total: usize, filtered: usize, snapshot: &QuerySnapshot) -> Self {
        FilterStats::new(total, filtered, snapshot.has_filters())
    }

    /// Records hidden by the current conditions.
    pub fn hidden(&self) -> usize {
        self.total.saturating_sub(self.filtered)
    }
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.filtered, self.total)
    }
}
