//! Filter configuration.
//!
//! A [`FilterConfig`] says which fields free-text search examines, which
//! discrete filters are offered, which fields carry a record's date, and how
//! long search input has to settle before it is applied. It can be built in
//! code or loaded from JSON or YAML:
//!
//! ```
//! use sifter::FilterConfig;
//!
//! let config = FilterConfig::from_yaml_str(r#"
//! searchable_fields: [name, email, agency.name]
//! filters:
//!   - key: status
//!     label: Status
//!     options:
//!       - { value: all, label: All }
//!       - { value: verified, label: Verified }
//!       - { value: pending, label: Pending }
//! debounce_ms: 250
//! "#).unwrap();
//!
//! assert_eq!(config.searchable_fields.len(), 3);
//! assert_eq!(config.filter("status").unwrap().option_label("pending"), Some("Pending"));
//! assert_eq!(config.debounce().as_millis(), 250);
//! ```

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::path::FieldPath;

/// Quiet period applied to search input unless configured otherwise.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Value that selects every record for a discrete filter.
pub const ALL: &str = "all";

/// Fields tried, in order, to find a record's date.
pub const DEFAULT_DATE_FIELDS: [&str; 3] = ["createdAt", "submittedAt", "joinedAt"];

/// One selectable option of a discrete filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        FilterOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Static description of one discrete, option-based filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Field path the filter applies to.
    pub key: String,
    /// Display label of the control.
    pub label: String,
    /// Options in display order.
    #[serde(default)]
    pub options: Vec<FilterOption>,
}

impl FilterSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        FilterSpec {
            key: key.into(),
            label: label.into(),
            options: Vec::new(),
        }
    }

    /// Appends an option.
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(FilterOption::new(value, label));
        self
    }

    /// Display label of the option with the given value.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|opt| opt.value == value)
            .map(|opt| opt.label.as_str())
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Fields examined by free-text search. Empty disables search.
    pub searchable_fields: Vec<FieldPath>,
    /// Discrete filters offered to the user.
    pub filters: Vec<FilterSpec>,
    /// Fields tried, in order, for the date-range stage.
    pub date_fields: Vec<FieldPath>,
    /// Search debounce, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            searchable_fields: Vec::new(),
            filters: Vec::new(),
            date_fields: DEFAULT_DATE_FIELDS.iter().map(|f| FieldPath::new(*f)).collect(),
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl FilterConfig {
    pub fn new() -> Self {
        FilterConfig::default()
    }

    /// Loads a config from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FilterConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Loads a config from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: FilterConfig = serde_yaml::from_str(yaml)?;
        Ok(config.normalized())
    }

    /// Sets the searchable fields.
    pub fn searchable<I, P>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<FieldPath>,
    {
        self.searchable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a discrete filter.
    pub fn filter_spec(mut self, spec: FilterSpec) -> Self {
        self.filters.push(spec);
        self
    }

    /// Replaces the date field fallback chain.
    pub fn date_fields<I, P>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<FieldPath>,
    {
        self.date_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the search debounce.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Search debounce as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Looks up a filter by key.
    pub fn filter(&self, key: &str) -> Option<&FilterSpec> {
        self.filters.iter().rev().find(|spec| spec.key == key)
    }

    /// Drops duplicate filter keys, keeping the last definition of each.
    ///
    /// Duplicates are a configuration mistake; each one is logged.
    pub fn normalized(mut self) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(self.filters.len());
        for spec in self.filters.into_iter().rev() {
            if seen.insert(spec.key.clone()) {
                kept.push(spec);
            } else {
                warn!(key = %spec.key, "duplicate filter key, keeping the last definition");
            }
        }
        kept.reverse();
        self.filters = kept;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FilterConfig::default();
        assert!(config.searchable_fields.is_empty());
        assert_eq!(config.debounce(), DEFAULT_DEBOUNCE);
        assert_eq!(
            config.date_fields,
            vec![
                FieldPath::new("createdAt"),
                FieldPath::new("submittedAt"),
                FieldPath::new("joinedAt")
            ]
        );
    }

    #[test]
    fn builder() {
        let config = FilterConfig::new()
            .searchable(["name", "email"])
            .filter_spec(FilterSpec::new("tier", "Tier").option("gold", "Gold"))
            .date_fields(["updatedAt"])
            .with_debounce(Duration::from_millis(50));

        assert_eq!(config.searchable_fields[1].as_str(), "email");
        assert_eq!(config.filter("tier").unwrap().label, "Tier");
        assert_eq!(config.date_fields, vec![FieldPath::new("updatedAt")]);
        assert_eq!(config.debounce_ms, 50);
    }

    #[test]
    fn duplicate_keys_keep_last() {
        let config = FilterConfig::new()
            .filter_spec(FilterSpec::new("status", "First"))
            .filter_spec(FilterSpec::new("tier", "Tier"))
            .filter_spec(FilterSpec::new("status", "Second"))
            .normalized();

        assert_eq!(config.filters.len(), 2);
        assert_eq!(config.filters[0].key, "tier");
        assert_eq!(config.filter("status").unwrap().label, "Second");
    }

    #[test]
    fn lookup_before_normalizing_prefers_last() {
        let config = FilterConfig::new()
            .filter_spec(FilterSpec::new("status", "First"))
            .filter_spec(FilterSpec::new("status", "Second"));
        assert_eq!(config.filter("status").unwrap().label, "Second");
    }

    #[test]
    fn from_json() {
        let config = FilterConfig::from_json_str(
            r#"{
                "searchable_fields": ["name"],
                "filters": [{"key": "status", "label": "Status"}]
            }"#,
        )
        .unwrap();

        assert_eq!(config.searchable_fields, vec![FieldPath::new("name")]);
        assert!(config.filters[0].options.is_empty());
        assert_eq!(config.debounce(), DEFAULT_DEBOUNCE);
        assert_eq!(config.date_fields.len(), 3);
    }

    #[test]
    fn invalid_config_is_an_error() {
        assert!(FilterConfig::from_json_str("{\"filters\": 3}").is_err());
        assert!(FilterConfig::from_yaml_str("filters: [[").is_err());
    }

    #[test]
    fn oversized_debounce_saturates() {
        let config = FilterConfig::new().with_debounce(Duration::MAX);
        assert_eq!(config.debounce_ms, u64::MAX);
        assert_eq!(config.debounce(), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn option_label_lookup() {
        let spec = FilterSpec::new("status", "Status")
            .option("all", "All")
            .option("verified", "Verified");
        assert_eq!(spec.option_label("verified"), Some("Verified"));
        assert_eq!(spec.option_label("rejected"), None);
    }
}
