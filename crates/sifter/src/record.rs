//! The seam between the engine and the records it filters.
//!
//! The engine never assumes a schema. It only asks a record for the value at a
//! [`FieldPath`]; anything implementing [`Filterable`] can be filtered.

use serde_json::Value as JsonValue;

use crate::path::FieldPath;
use crate::value::Value;

/// An opaque record: a mapping from field name to JSON value.
pub type Record = serde_json::Map<String, JsonValue>;

/// Trait for types whose fields can be searched, filtered and sorted.
///
/// Implemented for JSON documents and [`Record`] maps. Typed structs can
/// implement it by hand:
///
/// ```
/// use sifter::{Filterable, FieldPath, Value, Number};
///
/// struct Payment {
///     reference: String,
///     amount: f64,
/// }
///
/// impl Filterable for Payment {
///     fn field_value(&self, path: &FieldPath) -> Value<'_> {
///         match path.as_str() {
///             "reference" => Value::String(&self.reference),
///             "amount" => Value::Number(Number::F64(self.amount)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Filterable {
    /// Returns the value at `path`, or [`Value::None`] if it doesn't resolve.
    ///
    /// Must not panic for unknown paths.
    fn field_value(&self, path: &FieldPath) -> Value<'_>;
}

impl Filterable for JsonValue {
    fn field_value(&self, path: &FieldPath) -> Value<'_> {
        path.resolve(self).map(Value::from).unwrap_or(Value::None)
    }
}

impl Filterable for Record {
    fn field_value(&self, path: &FieldPath) -> Value<'_> {
        path.resolve_in(self).map(Value::from).unwrap_or(Value::None)
    }
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn field_value(&self, path: &FieldPath) -> Value<'_> {
        (**self).field_value(path)
    }
}

impl<T: Filterable + ?Sized> Filterable for Box<T> {
    fn field_value(&self, path: &FieldPath) -> Value<'_> {
        (**self).field_value(path)
    }
}
