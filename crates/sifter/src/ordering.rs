//! Sort specification and the total order used to sort records.
//!
//! Resolved field values can be of any type, so [`compare_values`] defines a
//! total order across all of them:
//!
//! ```text
//! Bool < Number < String < List/Object        (then absent, always last)
//! ```
//!
//! Within a class values compare naturally. Lists and objects compare equal
//! to each other. Absent values go last in both directions, so descending
//! order only reverses the present values.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::path::FieldPath;
use crate::record::Filterable;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// The opposite direction.
    pub fn flip(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The active sort: one field and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: FieldPath,
    #[serde(default)]
    pub dir: Dir,
}

impl SortSpec {
    pub fn new(field: impl Into<FieldPath>, dir: Dir) -> Self {
        SortSpec {
            field: field.into(),
            dir,
        }
    }

    pub fn asc(field: impl Into<FieldPath>) -> Self {
        SortSpec::new(field, Dir::Asc)
    }

    pub fn desc(field: impl Into<FieldPath>) -> Self {
        SortSpec::new(field, Dir::Desc)
    }

    /// Compares two records on this sort's field.
    pub fn compare<T: Filterable>(&self, a: &T, b: &T) -> Ordering {
        let va = a.field_value(&self.field);
        let vb = b.field_value(&self.field);
        match (va.is_none(), vb.is_none()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.dir.apply(compare_values(&va, &vb)),
        }
    }

    /// Stable-sorts `items` in place.
    pub fn sort<T: Filterable>(&self, items: &mut [&T]) {
        items.sort_by(|a, b| self.compare(*a, *b));
    }
}

fn rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::List(_) | Value::Object => 3,
        Value::None => 4,
    }
}

/// Total order over resolved values. Absent sorts after everything.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a.total_cmp(*b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)),
    }
}
