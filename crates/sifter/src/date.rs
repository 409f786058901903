//! Date parsing and the date-range stage.
//!
//! Dates arrive as strings (from date pickers and from records) or as epoch
//! milliseconds. Strings without an offset are read as UTC; a bare date is
//! midnight UTC of that day.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SifterError};
use crate::path::FieldPath;
use crate::record::Filterable;
use crate::value::{Timestamp, Value};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a date or date-time string.
///
/// Accepts RFC 3339, ISO date-times without an offset, and `YYYY-MM-DD`.
///
/// ```
/// use sifter::parse_timestamp;
///
/// let day = parse_timestamp("2024-01-15").unwrap();
/// let noon = parse_timestamp("2024-01-15T12:00:00Z").unwrap();
/// assert_eq!(noon.as_millis() - day.as_millis(), 12 * 3600 * 1000);
/// assert!(parse_timestamp("next tuesday").is_err());
/// ```
pub fn parse_timestamp(input: &str) -> Result<Timestamp> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).into());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc().into());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Timestamp::from(naive.and_utc()))
        .ok_or_else(|| SifterError::InvalidDate(input.to_string()))
}

/// Converts a resolved field value to a timestamp.
///
/// Strings are parsed, numbers are epoch milliseconds. Anything else has no
/// date.
pub fn value_timestamp(value: &Value<'_>) -> Option<Timestamp> {
    match value {
        Value::String(s) => parse_timestamp(s).ok(),
        Value::Number(n) => {
            let millis = n.to_f64();
            millis.is_finite().then(|| Timestamp(millis as i64))
        }
        _ => None,
    }
}

/// A record's date: the first present field of `fields`, converted.
///
/// Only the first present field is considered; if it doesn't parse the
/// record has no date, even if a later field would have. An empty string
/// counts as present and does not fall through to the next field.
pub fn record_timestamp<T: Filterable + ?Sized>(
    record: &T,
    fields: &[FieldPath],
) -> Option<Timestamp> {
    fields
        .iter()
        .map(|field| record.field_value(field))
        .find(|value| value.is_present())
        .and_then(|value| value_timestamp(&value))
}

/// Optional inclusive date bounds, kept as the raw strings the user entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl DateRange {
    /// Creates a range; empty strings count as no bound.
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        let bound = |b: Option<&str>| b.filter(|s| !s.trim().is_empty()).map(str::to_string);
        DateRange {
            from: bound(from),
            to: bound(to),
        }
    }

    /// Returns `true` if either bound is set.
    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Parsed bounds, with absent bounds open-ended.
    ///
    /// Returns `None` if a bound is set but doesn't parse; such a range
    /// admits nothing.
    pub fn window(&self) -> Option<(Timestamp, Timestamp)> {
        let from = match &self.from {
            Some(s) => parse_timestamp(s).ok()?,
            None => Timestamp::MIN,
        };
        let to = match &self.to {
            Some(s) => parse_timestamp(s).ok()?,
            None => Timestamp::MAX,
        };
        Some((from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;
    use serde_json::json;

    #[test]
    fn parses_supported_formats() {
        let day = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(parse_timestamp("2024-03-01T00:00:00Z").unwrap(), day);
        assert_eq!(parse_timestamp("2024-03-01T00:00:00.000Z").unwrap(), day);
        assert_eq!(parse_timestamp("2024-03-01T00:00").unwrap(), day);
        assert_eq!(parse_timestamp("2024-03-01 00:00:00").unwrap(), day);
        assert_eq!(parse_timestamp(" 2024-03-01 ").unwrap(), day);
        assert_eq!(
            parse_timestamp("2024-03-01T02:00:00+02:00").unwrap(),
            day
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_timestamp("31/01/2024"),
            Err(SifterError::InvalidDate(s)) if s == "31/01/2024"
        ));
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("2024-02-30").is_err());
    }

    #[test]
    fn value_timestamps() {
        assert_eq!(
            value_timestamp(&Value::Number(Number::I64(1_000))),
            Some(Timestamp(1_000))
        );
        assert_eq!(
            value_timestamp(&Value::Number(Number::F64(f64::NAN))),
            None
        );
        assert_eq!(value_timestamp(&Value::Bool(true)), None);
        assert!(value_timestamp(&Value::String("2024-01-01")).is_some());
    }

    #[test]
    fn fallback_chain_uses_first_present_field() {
        let fields: Vec<FieldPath> = vec!["createdAt".into(), "submittedAt".into()];

        let submitted = json!({"submittedAt": "2024-01-02"});
        assert_eq!(
            record_timestamp(&submitted, &fields),
            parse_timestamp("2024-01-02").ok()
        );

        let both = json!({"createdAt": "2024-01-01", "submittedAt": "2024-01-02"});
        assert_eq!(
            record_timestamp(&both, &fields),
            parse_timestamp("2024-01-01").ok()
        );

        let broken = json!({"createdAt": "soon", "submittedAt": "2024-01-02"});
        assert_eq!(record_timestamp(&broken, &fields), None);

        let blank = json!({"createdAt": "", "submittedAt": "2024-01-02"});
        assert_eq!(record_timestamp(&blank, &fields), None);

        assert_eq!(record_timestamp(&json!({}), &fields), None);
    }

    #[test]
    fn range_activity_and_window() {
        assert!(!DateRange::default().is_active());
        assert!(!DateRange::new(Some(""), Some("  ")).is_active());

        let open_end = DateRange::new(Some("2024-01-01"), None);
        assert!(open_end.is_active());
        let (from, to) = open_end.window().unwrap();
        assert_eq!(from, parse_timestamp("2024-01-01").unwrap());
        assert_eq!(to, Timestamp::MAX);

        assert_eq!(DateRange::new(None, Some("later")).window(), None);
    }
}
