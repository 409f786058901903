//! The reactive filter engine.
//!
//! [`FilterEngine`] owns a record collection, a [`FilterConfig`] and a
//! [`QueryState`]. Every mutating call recomputes the result synchronously
//! and hands it to the subscriber before returning, so a caller never sees a
//! result that disagrees with the state delivered next to it.
//!
//! Search input is the exception: [`FilterEngine::set_search_text`] only
//! schedules the text, and the result follows once the quiet period has
//! passed and the owner calls [`FilterEngine::poll`].
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use serde_json::json;
//! use sifter::{FilterConfig, FilterEngine};
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let mut engine = FilterEngine::new(FilterConfig::new().searchable(["name"]));
//! engine.set_records(vec![
//!     json!({"name": "Rachel Adams", "status": "pending"}),
//!     json!({"name": "David Wilson", "status": "verified"}),
//! ]);
//!
//! let sink = Rc::clone(&seen);
//! engine.subscribe(move |result, _snapshot| sink.borrow_mut().push(result.len()));
//! engine.set_filter_value("status", "verified");
//! engine.set_filter_value("status", "all");
//!
//! assert_eq!(*seen.borrow(), vec![2, 1, 2]);
//! ```

use tracing::{debug, trace};

use crate::config::{FilterConfig, FilterSpec};
use crate::date::DateRange;
use crate::debounce::{Clock, Debouncer, SystemClock};
use crate::ordering::{Dir, SortSpec};
use crate::path::FieldPath;
use crate::query::{QuerySnapshot, QueryState};
use crate::record::Filterable;
use crate::stats::{FilterStats, ResultSet};

type Subscriber<T> = Box<dyn FnMut(&ResultSet<'_, T>, &QuerySnapshot)>;

/// One active discrete filter, resolved to display labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveChip {
    pub key: String,
    /// Filter label, or the key if the filter isn't configured.
    pub label: String,
    pub value: String,
    /// Option label, or the raw value if it isn't one of the options.
    pub value_label: String,
}

/// Search, filter, date-range and sort state over an owned record collection.
pub struct FilterEngine<T, C: Clock = SystemClock> {
    config: FilterConfig,
    records: Vec<T>,
    state: QueryState,
    search: Debouncer<String, C>,
    subscriber: Option<Subscriber<T>>,
}

impl<T: Filterable> FilterEngine<T, SystemClock> {
    /// Creates an engine with no records, debouncing on wall-clock time.
    pub fn new(config: FilterConfig) -> Self {
        FilterEngine::with_clock(config, SystemClock)
    }
}

impl<T: Filterable, C: Clock> FilterEngine<T, C> {
    /// Creates an engine on the given clock.
    pub fn with_clock(config: FilterConfig, clock: C) -> Self {
        let config = config.normalized();
        let search = Debouncer::with_clock(config.debounce(), clock);
        FilterEngine {
            config,
            records: Vec::new(),
            state: QueryState::new(),
            search,
            subscriber: None,
        }
    }

    // ========================================================================
    // Wiring
    // ========================================================================

    /// Registers the result callback, replacing any previous one, and calls
    /// it once with the current result.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&ResultSet<'_, T>, &QuerySnapshot) + 'static,
    {
        self.subscriber = Some(Box::new(subscriber));
        self.notify();
    }

    /// Removes the result callback.
    pub fn unsubscribe(&mut self) {
        self.subscriber = None;
    }

    /// Replaces the whole configuration.
    ///
    /// Selected filter values are kept even if their key is no longer
    /// offered; callers clear them explicitly if they want to.
    pub fn configure(&mut self, config: FilterConfig) {
        self.config = config.normalized();
        self.search.set_delay(self.config.debounce());
        self.notify();
    }

    /// Replaces the searchable fields and offered filters, keeping the date
    /// fields and debounce.
    pub fn configure_fields<I, P>(&mut self, searchable_fields: I, filters: Vec<FilterSpec>)
    where
        I: IntoIterator<Item = P>,
        P: Into<FieldPath>,
    {
        let mut config = self.config.clone().searchable(searchable_fields);
        config.filters = filters;
        self.configure(config);
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Replaces the source collection.
    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.notify();
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Updates the raw search text and restarts the debounce timer.
    ///
    /// The result is not recomputed until the text settles.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.state.set_search_text(text.clone());
        self.search.schedule(text);
    }

    /// Applies settled search text. Call this from the owner's event loop.
    ///
    /// Returns `true` if the result was recomputed.
    pub fn poll(&mut self) -> bool {
        match self.search.poll() {
            Some(text) => self.apply_search(text),
            None => false,
        }
    }

    /// Applies pending search text without waiting.
    pub fn flush_search(&mut self) -> bool {
        match self.search.flush() {
            Some(text) => self.apply_search(text),
            None => false,
        }
    }

    /// Returns `true` while typed search text is waiting to settle.
    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    fn apply_search(&mut self, text: String) -> bool {
        if text == self.state.debounced_search() {
            return false;
        }
        trace!(search = %text, "search settled");
        self.state.set_debounced_search(text);
        self.notify();
        true
    }

    // ========================================================================
    // Filters, dates and sort
    // ========================================================================

    /// Selects a filter value; `"all"` or `""` clears the filter.
    pub fn set_filter_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        if self.state.set_filter(key, value) {
            self.notify();
        }
    }

    /// Removes one filter.
    pub fn clear_filter(&mut self, key: &str) {
        if self.state.clear_filter(key) {
            self.notify();
        }
    }

    /// Sets the date bounds. `None` or an empty string leaves a side open.
    pub fn set_date_range(&mut self, from: Option<&str>, to: Option<&str>) {
        let range = DateRange::new(from, to);
        if &range != self.state.date_range() {
            self.state.set_date_range(range);
            self.notify();
        }
    }

    /// Sorts by `field`.
    pub fn set_sort(&mut self, field: impl Into<FieldPath>, dir: Dir) {
        self.replace_sort(Some(SortSpec::new(field, dir)));
    }

    /// Drops the sort, leaving records in filtered order.
    pub fn clear_sort(&mut self) {
        self.replace_sort(None);
    }

    /// Column-header behaviour: sorting by the current field flips the
    /// direction, any other field starts ascending.
    pub fn toggle_sort(&mut self, field: impl Into<FieldPath>) {
        let field = field.into();
        let dir = match self.state.sort() {
            Some(current) if current.field == field => current.dir.flip(),
            _ => Dir::Asc,
        };
        self.replace_sort(Some(SortSpec::new(field, dir)));
    }

    fn replace_sort(&mut self, sort: Option<SortSpec>) {
        if sort.as_ref() != self.state.sort() {
            self.state.set_sort(sort);
            self.notify();
        }
    }

    /// Resets search, filters, date range and sort in one step, discarding
    /// any search text still waiting to settle.
    pub fn clear_all(&mut self) {
        self.search.cancel();
        self.state.clear();
        self.notify();
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Runs the current query over `records`. Pure; touches no engine state.
    pub fn recompute<'a>(&self, records: &'a [T]) -> (ResultSet<'a, T>, QuerySnapshot) {
        (
            ResultSet::compute(&self.state, &self.config, records),
            self.state.snapshot(),
        )
    }

    /// Runs the current query over the engine's own records.
    pub fn result(&self) -> ResultSet<'_, T> {
        ResultSet::compute(&self.state, &self.config, &self.records)
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn snapshot(&self) -> QuerySnapshot {
        self.state.snapshot()
    }

    /// Restores a persisted snapshot and recomputes.
    pub fn restore(&mut self, snapshot: QuerySnapshot) {
        self.search.cancel();
        self.state = QueryState::restore(snapshot);
        self.notify();
    }

    pub fn active_filter_count(&self) -> usize {
        self.state.active_filter_count()
    }

    pub fn has_filters(&self) -> bool {
        self.state.has_filters()
    }

    pub fn stats(&self) -> FilterStats {
        self.result().stats()
    }

    /// Active discrete filters with their display labels, in key order.
    pub fn active_chips(&self) -> Vec<ActiveChip> {
        self.state
            .filters()
            .iter()
            .map(|(key, value)| {
                let spec = self.config.filter(key);
                ActiveChip {
                    key: key.clone(),
                    label: spec.map_or_else(|| key.clone(), |s| s.label.clone()),
                    value: value.clone(),
                    value_label: spec
                        .and_then(|s| s.option_label(value))
                        .unwrap_or(value.as_str())
                        .to_string(),
                }
            })
            .collect()
    }

    fn notify(&mut self) {
        let Some(subscriber) = self.subscriber.as_mut() else {
            return;
        };
        let result = ResultSet::compute(&self.state, &self.config, &self.records);
        let snapshot = self.state.snapshot();
        debug!(
            total = result.total(),
            filtered = result.len(),
            active_filters = result.active_filter_count(),
            "recomputed filter result"
        );
        subscriber(&result, &snapshot);
    }
}

impl<T, C: Clock> std::fmt::Debug for FilterEngine<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field("config", &self.config)
            .field("records", &self.records.len())
            .field("state", &self.state)
            .field("search_pending", &self.search.is_pending())
            .field("subscribed", &self.subscriber.is_some())
            .finish()
    }
}
