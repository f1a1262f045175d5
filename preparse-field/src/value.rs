//! Typed normalization, display and column sizing for field values.

use chrono::{DateTime, Utc};
use preparse_model::{ColumnType, StorageType};
use preparse_types::{FieldValue, is_falsy};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::column::DefaultColumnSizer;
use crate::datetime::FlexibleDateTimeParser;
use crate::host::{ColumnSizer, DateTimeParser, LocaleFormatter};
use crate::locale::{Locale, ShortFormatter};

/// Storage-type driven value handling.
///
/// Holds no state besides its collaborators; cheap to clone and safe to
/// share between threads.
#[derive(Clone)]
pub struct TypedFieldValue {
    parser: Arc<dyn DateTimeParser>,
    formatter: Arc<dyn LocaleFormatter>,
    sizer: Arc<dyn ColumnSizer>,
}

impl Default for TypedFieldValue {
    fn default() -> Self {
        Self {
            parser: Arc::new(FlexibleDateTimeParser),
            formatter: Arc::new(ShortFormatter::new()),
            sizer: Arc::new(DefaultColumnSizer),
        }
    }
}

impl TypedFieldValue {
    pub fn new(
        parser: Arc<dyn DateTimeParser>,
        formatter: Arc<dyn LocaleFormatter>,
        sizer: Arc<dyn ColumnSizer>,
    ) -> Self {
        Self {
            parser,
            formatter,
            sizer,
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn DateTimeParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn LocaleFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_sizer(mut self, sizer: Arc<dyn ColumnSizer>) -> Self {
        self.sizer = sizer;
        self
    }

    /// Normalizes a raw stored or submitted value.
    ///
    /// Datetime storage parses the value and yields `Null` for falsy or
    /// unparseable input. Every other storage type passes the value through
    /// untouched; numeric strings are not coerced.
    pub fn normalize(&self, raw: Value, storage_type: StorageType) -> FieldValue {
        if storage_type != StorageType::DateTime {
            return FieldValue::Value(raw);
        }
        if is_falsy(&raw) {
            return FieldValue::Null;
        }
        match self.parser.parse(&raw) {
            Some(dt) => FieldValue::DateTime(dt),
            None => {
                debug!(raw = %raw, "unparseable datetime normalized to null");
                FieldValue::Null
            }
        }
    }

    /// Column descriptor for a field of this storage type.
    pub fn persist_column_type(&self, storage_type: StorageType, decimal_places: u32) -> ColumnType {
        match storage_type {
            StorageType::Decimal => self.sizer.decimal_column(None, None, decimal_places),
            StorageType::Text => ColumnType::Text,
            StorageType::MediumText => ColumnType::MediumText,
            StorageType::Integer => ColumnType::Integer,
            StorageType::Float => ColumnType::Float,
            StorageType::DateTime => ColumnType::DateTime,
        }
    }

    /// Read-only display string for listings and other summary contexts.
    ///
    /// Falsy values (including `0` and `"0"`) render as `""` for every
    /// storage type, matching what `normalize` treats as empty. Datetimes render
    /// as `<span title="{date short}">{timestamp short}</span>`; everything
    /// else as its HTML-escaped scalar text.
    pub fn format_for_display(
        &self,
        value: &FieldValue,
        storage_type: StorageType,
        locale: &Locale,
    ) -> String {
        if value.is_empty() {
            return String::new();
        }
        if storage_type == StorageType::DateTime {
            if let Some(dt) = self.datetime_of(value) {
                return self.datetime_html(&dt, locale);
            }
        }
        html_escape::encode_text(&scalar_text(&value.to_storage())).into_owned()
    }

    /// Converts a normalized value into the form written to storage.
    pub fn serialize(&self, value: &FieldValue, storage_type: StorageType) -> Value {
        match (storage_type, value) {
            (StorageType::DateTime, FieldValue::Value(raw)) => {
                self.normalize(raw.clone(), storage_type).to_storage()
            }
            _ => value.to_storage(),
        }
    }

    fn datetime_of(&self, value: &FieldValue) -> Option<DateTime<Utc>> {
        match value {
            FieldValue::DateTime(dt) => Some(*dt),
            FieldValue::Value(raw) => self.parser.parse(raw),
            FieldValue::Null => None,
        }
    }

    fn datetime_html(&self, dt: &DateTime<Utc>, locale: &Locale) -> String {
        let title = self.formatter.format_date_short(dt, locale);
        let label = self.formatter.format_timestamp_short(dt, locale);
        format!(
            "<span title=\"{}\">{}</span>",
            html_escape::encode_double_quoted_attribute(&title),
            html_escape::encode_text(&label)
        )
    }
}

pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}
