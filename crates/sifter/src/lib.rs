//! Sifter - client-side search, filter and sort over in-memory records.
//!
//! Sifter backs list screens: a caller supplies a record collection and a
//! field configuration, the user types search text, picks filter options,
//! narrows a date range and sorts a column, and the engine reports the
//! matching records together with a snapshot of the active query.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use sifter::{Dir, FilterConfig, FilterEngine, FilterSpec};
//!
//! let config = FilterConfig::new()
//!     .searchable(["name", "email"])
//!     .filter_spec(
//!         FilterSpec::new("status", "Status")
//!             .option("all", "All")
//!             .option("verified", "Verified")
//!             .option("pending", "Pending"),
//!     );
//!
//! let mut engine = FilterEngine::new(config);
//! engine.set_records(vec![
//!     json!({"id": "AGT-001", "name": "David Wilson", "status": "verified",
//!            "performance": {"rating": 4.8}}),
//!     json!({"id": "AGT-002", "name": "Rachel Adams", "status": "pending",
//!            "performance": {"rating": 4.2}}),
//! ]);
//!
//! engine.set_sort("performance.rating", Dir::Asc);
//! let ids: Vec<_> = engine.result().iter().map(|r| r["id"].clone()).collect();
//! assert_eq!(ids, vec![json!("AGT-002"), json!("AGT-001")]);
//!
//! engine.set_filter_value("status", "verified");
//! assert_eq!(engine.result().len(), 1);
//! assert_eq!(engine.active_filter_count(), 1);
//! ```
//!
//! # Pipeline
//!
//! Each stage narrows the output of the previous one:
//!
//! 1. **Search**: a record matches if any searchable field contains the
//!    settled search text, case-insensitively.
//! 2. **Discrete filters**: every selected filter must match. Scalars need
//!    full (case-insensitive) equality; list fields match if any element
//!    contains the value.
//! 3. **Date range**: the record's date (first present of the configured
//!    date fields) must fall within the inclusive bounds.
//! 4. **Sort**: stable, on one field, absent values last.
//!
//! Nothing in the pipeline errors. Paths that don't resolve, values of the
//! wrong type and dates that don't parse simply don't match.
//!
//! # Records
//!
//! Anything implementing [`Filterable`] can be filtered. JSON documents
//! ([`serde_json::Value`]) and [`Record`] maps work out of the box, with
//! nested fields addressed by dotted [`FieldPath`]s.

mod config;
mod date;
mod debounce;
mod engine;
mod error;
mod matching;
mod ordering;
mod path;
mod query;
mod record;
mod stats;
mod value;

// Re-export public API
pub use config::{
    FilterConfig, FilterOption, FilterSpec, ALL, DEFAULT_DATE_FIELDS, DEFAULT_DEBOUNCE,
};
pub use date::{parse_timestamp, record_timestamp, value_timestamp, DateRange};
pub use debounce::{Clock, Debouncer, ManualClock, SystemClock};
pub use engine::{ActiveChip, FilterEngine};
pub use error::{Result, SifterError};
pub use matching::{matches_filter, matches_search};
pub use ordering::{compare_values, Dir, SortSpec};
pub use path::FieldPath;
pub use query::{is_unset, QuerySnapshot, QueryState};
pub use record::{Filterable, Record};
pub use stats::{FilterStats, ResultSet};
pub use value::{Number, Timestamp, Value};
