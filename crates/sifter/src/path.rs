//! Dot-delimited field paths.
//!
//! A [`FieldPath`] addresses a possibly-nested attribute of a record, such as
//! `performance.rating`. Resolution is lazy and tolerant: a missing segment
//! anywhere along the way resolves to [`Value::None`](crate::Value::None).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Address of a (possibly nested) record attribute.
///
/// ```
/// use sifter::FieldPath;
///
/// let path = FieldPath::new("performance.rating");
/// assert_eq!(path.segments().collect::<Vec<_>>(), vec!["performance", "rating"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath(String);

impl FieldPath {
    /// Creates a path from its dotted form.
    pub fn new(path: impl Into<String>) -> Self {
        FieldPath(path.into())
    }

    /// Returns the dotted form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the non-empty segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    /// Walks a JSON document along this path.
    ///
    /// Object segments look up keys, numeric segments index into arrays.
    /// Returns `None` as soon as a segment cannot be followed.
    pub fn resolve<'a>(&self, root: &'a JsonValue) -> Option<&'a JsonValue> {
        let mut current = root;
        for segment in self.segments() {
            current = match current {
                JsonValue::Object(map) => map.get(segment)?,
                JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Same as [`resolve`](Self::resolve), starting from a bare map.
    pub fn resolve_in<'a>(
        &self,
        map: &'a serde_json::Map<String, JsonValue>,
    ) -> Option<&'a JsonValue> {
        let mut segments = self.segments();
        let first = map.get(segments.next()?)?;
        segments.try_fold(first, |current, segment| match current {
            JsonValue::Object(map) => map.get(segment),
            JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?),
            _ => None,
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        FieldPath(s)
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        FieldPath(s.to_string())
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}
