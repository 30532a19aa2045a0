//! Typed runtime values and the Airtable JSON encodings
//!
//! Conversion table:
//! datetimes ↔ ISO-8601 / RFC 3339 strings, dates ↔ `YYYY-MM-DD`,
//! durations ↔ whole seconds, checkboxes coerced to bool, numeric
//! columns coerced to f64. Deserialization is best-effort: a malformed
//! date string comes back unchanged as text, never as an error.

use super::types::FieldType;
use crate::types::JsonValue;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::json;

/// A typed runtime value for one field of a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent or cleared value
    Null,
    /// String value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Timezone-aware timestamp
    DateTime(DateTime<Utc>),
    /// Calendar date
    Date(NaiveDate),
    /// Span of time in whole seconds
    Duration(i64),
    /// List of strings (multi-select)
    List(Vec<String>),
    /// Raw JSON passthrough for shapes this library does not model
    /// (attachments, linked records, ...)
    Json(JsonValue),
}

impl FieldValue {
    /// The contained text, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The contained number, if this is a numeric value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The contained boolean, if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The contained timestamp, if this is a datetime value
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// The contained date, if this is a date value
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Whether this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(f64::from(n))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(dt: DateTime<Utc>) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => FieldValue::Null,
        }
    }
}

// ============================================================================
// Serialization (Rust value -> Airtable JSON)
// ============================================================================

/// Serialize a value into the JSON encoding Airtable expects for a column type
pub fn to_api_value(value: &FieldValue, field_type: FieldType) -> JsonValue {
    if value.is_null() {
        return JsonValue::Null;
    }

    match field_type {
        FieldType::DateTime => match value {
            FieldValue::DateTime(dt) => {
                json!(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            other => json_encode(other),
        },
        FieldType::Date => match value {
            FieldValue::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
            FieldValue::DateTime(dt) => json!(dt.date_naive().format("%Y-%m-%d").to_string()),
            other => json_encode(other),
        },
        FieldType::Checkbox => match value {
            FieldValue::Bool(b) => json!(b),
            FieldValue::Number(n) => json!(*n != 0.0),
            other => json_encode(other),
        },
        FieldType::Number | FieldType::Currency | FieldType::Percent => match value {
            FieldValue::Number(n) => json!(n),
            // booleans are never coerced to numbers
            FieldValue::Bool(b) => json!(b),
            other => json_encode(other),
        },
        FieldType::Duration => match value {
            FieldValue::Duration(seconds) => json!(seconds),
            FieldValue::Number(n) => json!(*n as i64),
            other => json_encode(other),
        },
        _ => json_encode(value),
    }
}

/// Natural JSON encoding of a value, independent of column type
fn json_encode(value: &FieldValue) -> JsonValue {
    match value {
        FieldValue::Null => JsonValue::Null,
        FieldValue::Text(s) => json!(s),
        FieldValue::Number(n) => json!(n),
        FieldValue::Bool(b) => json!(b),
        FieldValue::DateTime(dt) => json!(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        FieldValue::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
        FieldValue::Duration(seconds) => json!(seconds),
        FieldValue::List(items) => json!(items),
        FieldValue::Json(v) => v.clone(),
    }
}

// ============================================================================
// Deserialization (Airtable JSON -> Rust value)
// ============================================================================

/// Parse an Airtable JSON value into a typed value for a column type
///
/// Best-effort: malformed date and datetime strings are returned unchanged
/// as text rather than failing.
pub fn from_api_value(value: &JsonValue, field_type: FieldType) -> FieldValue {
    if value.is_null() {
        return FieldValue::Null;
    }

    match field_type {
        FieldType::DateTime | FieldType::CreatedTime | FieldType::LastModifiedTime => {
            match value {
                JsonValue::String(s) => DateTime::parse_from_rfc3339(s)
                    .map(|dt| FieldValue::DateTime(dt.with_timezone(&Utc)))
                    .unwrap_or_else(|_| FieldValue::Text(s.clone())),
                other => json_decode(other),
            }
        }
        FieldType::Date => match value {
            JsonValue::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(FieldValue::Date)
                .unwrap_or_else(|_| FieldValue::Text(s.clone())),
            other => json_decode(other),
        },
        FieldType::Checkbox => match value {
            JsonValue::Bool(b) => FieldValue::Bool(*b),
            JsonValue::Number(n) => FieldValue::Bool(n.as_f64().unwrap_or(0.0) != 0.0),
            other => json_decode(other),
        },
        FieldType::Number | FieldType::Currency | FieldType::Percent | FieldType::AutoNumber
        | FieldType::Count => match value {
            JsonValue::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(0.0)),
            other => json_decode(other),
        },
        FieldType::Duration => match value {
            JsonValue::Number(n) => FieldValue::Duration(n.as_i64().unwrap_or(0)),
            other => json_decode(other),
        },
        FieldType::MultipleSelects => json_decode(value),
        _ => json_decode(value),
    }
}

/// Natural decoding of a JSON value, independent of column type
fn json_decode(value: &JsonValue) -> FieldValue {
    match value {
        JsonValue::Null => FieldValue::Null,
        JsonValue::Bool(b) => FieldValue::Bool(*b),
        JsonValue::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(0.0)),
        JsonValue::String(s) => FieldValue::Text(s.clone()),
        JsonValue::Array(items) => {
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect();
            match strings {
                Some(list) => FieldValue::List(list),
                None => FieldValue::Json(value.clone()),
            }
        }
        JsonValue::Object(_) => FieldValue::Json(value.clone()),
    }
}
