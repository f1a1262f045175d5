//! Flexible datetime parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Value};

use crate::host::DateTimeParser;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M %p", "%I:%M%p"];

/// Accepts the datetime shapes a host typically stores or receives.
///
/// - RFC 3339 and RFC 2822 strings (offsets are converted to UTC)
/// - `YYYY-MM-DD HH:MM[:SS[.f]]`, with a space or `T`, read as UTC
/// - `YYYY-MM-DD`, `MM/DD/YYYY` and `DD.MM.YYYY`, at midnight UTC
/// - UNIX timestamps in seconds, as numbers or digit strings
/// - date-picker objects `{"date": "...", "time": "..."}`
#[derive(Debug, Clone, Copy, Default)]
pub struct FlexibleDateTimeParser;

impl DateTimeParser for FlexibleDateTimeParser {
    fn parse(&self, raw: &Value) -> Option<DateTime<Utc>> {
        match raw {
            Value::String(s) => parse_str(s.trim()),
            Value::Number(n) => match n.as_i64() {
                Some(secs) => DateTime::from_timestamp(secs, 0),
                None => n.as_f64().and_then(from_float_timestamp),
            },
            Value::Object(map) => parse_picker(map),
            _ => None,
        }
    }
}

fn parse_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    let digits = s.strip_prefix('-').unwrap_or(s);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(|secs| DateTime::from_timestamp(secs, 0));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_date(s).map(|date| date.and_time(NaiveTime::MIN)))
        .map(|naive| naive.and_utc())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

fn from_float_timestamp(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

// Date pickers submit the two halves separately; a missing time means midnight.
fn parse_picker(map: &Map<String, Value>) -> Option<DateTime<Utc>> {
    let date = map.get("date")?.as_str()?.trim();
    let date = parse_date(date)?;
    let time = match map.get("time").and_then(Value::as_str).map(str::trim) {
        Some(t) if !t.is_empty() => parse_time(t)?,
        _ => NaiveTime::MIN,
    };
    Some(date.and_time(time).and_utc())
}
