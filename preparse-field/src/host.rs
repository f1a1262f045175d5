//! Interfaces the field consumes from its host.
//!
//! Each trait has a default implementation in this crate, but the field
//! only ever talks to the trait, so a host can swap any of them out.

use chrono::{DateTime, Utc};
use preparse_model::ColumnType;
use serde_json::Value;
use std::sync::Arc;

use crate::error::Result;
use crate::locale::Locale;

/// Renders settings/input templates and evaluates field expressions.
pub trait TemplateRenderer: Send + Sync {
    /// Renders a named template (e.g. the field's `_input` template).
    fn render_template(&self, path: &str, context: &Value) -> Result<String>;

    /// Renders an inline template string, such as a field expression.
    fn render_string(&self, template: &str, context: &Value) -> Result<String>;
}

/// Parses loosely formatted datetime input.
pub trait DateTimeParser: Send + Sync {
    /// Returns `None` when the value is not a recognizable datetime.
    fn parse(&self, raw: &Value) -> Option<DateTime<Utc>>;
}

/// Locale-aware short datetime labels.
pub trait LocaleFormatter: Send + Sync {
    /// Full short form: date and time.
    fn format_date_short(&self, dt: &DateTime<Utc>, locale: &Locale) -> String;

    /// Compact short form, relative to the current day.
    fn format_timestamp_short(&self, dt: &DateTime<Utc>, locale: &Locale) -> String;
}

/// Sizes numeric content columns.
pub trait ColumnSizer: Send + Sync {
    /// Decimal column wide enough for `min..=max` with `decimals` places.
    /// `None` bounds default to the signed 64-bit range.
    fn decimal_column(&self, min: Option<i64>, max: Option<i64>, decimals: u32) -> ColumnType;
}

/// Translation lookup: `(category, message) -> translated message`.
pub type Translator = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// A translator that returns every message unchanged.
pub fn identity_translator() -> Translator {
    Arc::new(|_category: &str, message: &str| message.to_string())
}
