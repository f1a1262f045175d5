//! Normalized field values.
//!
//! A [`FieldValue`] is what a field hands back to the host after
//! normalization. Pass-through storage types keep the raw JSON value
//! untouched; datetime storage holds a parsed UTC instant or nothing.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::{Error, Result};

/// Format used when a datetime is written to a content column.
pub const STORAGE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The normalized form of a stored or submitted field value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// No value. Produced for empty or unparseable datetime input.
    #[default]
    Null,
    /// A raw value passed through without coercion.
    Value(Value),
    /// A parsed datetime, always in UTC.
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Returns true for values that display as nothing: `Null` and every
    /// falsy raw value (see [`is_falsy`]).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::DateTime(_) => false,
            Self::Value(v) => is_falsy(v),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Value(Value::Null))
    }

    /// Returns the parsed datetime, if this is one.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Converts the value into the JSON form written to storage.
    ///
    /// Datetimes become `YYYY-MM-DD HH:MM:SS` strings in UTC.
    pub fn to_storage(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Value(v) => v.clone(),
            Self::DateTime(dt) => Value::String(dt.format(STORAGE_DATETIME_FORMAT).to_string()),
        }
    }

    /// Reads a datetime previously written by [`FieldValue::to_storage`].
    pub fn from_storage_datetime(s: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(s, STORAGE_DATETIME_FORMAT)
            .map(|naive| Self::DateTime(naive.and_utc()))
            .map_err(|e| Error::InvalidDateTime(format!("{s}: {e}")))
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }
}

/// Falsiness in the host's loose sense: null, `false`, `0`, `""`, `"0"`,
/// and empty arrays or objects.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
