//! Locale-aware short datetime labels.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::host::LocaleFormatter;

/// A formatting locale, identified by a BCP 47 style tag such as `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Lowercased language subtag (`en` for `en-US` and `en_GB`).
    pub fn language(&self) -> String {
        self.0
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    fn normalized(&self) -> String {
        self.0.replace('_', "-").to_ascii_lowercase()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en-US")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ShortPatterns {
    date: &'static str,
    time: &'static str,
    separator: &'static str,
}

const ISO: ShortPatterns = ShortPatterns {
    date: "%Y-%m-%d",
    time: "%H:%M",
    separator: " ",
};

fn patterns_for(locale: &Locale) -> ShortPatterns {
    match locale.normalized().as_str() {
        "en-gb" | "en-au" | "en-nz" | "en-ie" => {
            return ShortPatterns {
                date: "%d/%m/%Y",
                time: "%H:%M",
                separator: ", ",
            };
        }
        "en-ca" => {
            return ShortPatterns {
                date: "%Y-%m-%d",
                time: "%-I:%M %p",
                separator: ", ",
            };
        }
        _ => {}
    }

    match locale.language().as_str() {
        "en" => ShortPatterns {
            date: "%-m/%-d/%y",
            time: "%-I:%M %p",
            separator: ", ",
        },
        "de" => ShortPatterns {
            date: "%d.%m.%y",
            time: "%H:%M",
            separator: ", ",
        },
        "fr" => ShortPatterns {
            date: "%d/%m/%Y",
            time: "%H:%M",
            separator: " ",
        },
        "nb" | "nn" | "no" => ShortPatterns {
            date: "%d.%m.%Y",
            time: "%H:%M",
            separator: ", ",
        },
        "ja" => ShortPatterns {
            date: "%Y/%m/%d",
            time: "%H:%M",
            separator: " ",
        },
        _ => ISO,
    }
}

/// Default [`LocaleFormatter`]: fixed per-locale short patterns rendered in
/// one configured UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct ShortFormatter {
    offset: FixedOffset,
    now: Option<DateTime<Utc>>,
}

impl Default for ShortFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortFormatter {
    /// Formats in UTC against the real clock.
    pub fn new() -> Self {
        Self {
            offset: Utc.fix(),
            now: None,
        }
    }

    /// Renders labels in the given offset instead of UTC.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Pins "today" for the timestamp form.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}

impl LocaleFormatter for ShortFormatter {
    fn format_date_short(&self, dt: &DateTime<Utc>, locale: &Locale) -> String {
        let p = patterns_for(locale);
        let local = dt.with_timezone(&self.offset);
        format!(
            "{}{}{}",
            local.format(p.date),
            p.separator,
            local.format(p.time)
        )
    }

    /// Time alone when `dt` falls on the current day, otherwise the date alone.
    fn format_timestamp_short(&self, dt: &DateTime<Utc>, locale: &Locale) -> String {
        let p = patterns_for(locale);
        let local = dt.with_timezone(&self.offset);
        let today = self
            .now
            .unwrap_or_else(Utc::now)
            .with_timezone(&self.offset)
            .date_naive();
        if local.date_naive() == today {
            local.format(p.time).to_string()
        } else {
            local.format(p.date).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 0).unwrap()
    }

    #[test]
    fn language_subtag() {
        assert_eq!(Locale::new("en_GB").language(), "en");
        assert_eq!(Locale::new("NB-no").language(), "nb");
    }

    #[test]
    fn date_short_per_locale() {
        let f = ShortFormatter::new();
        assert_eq!(f.format_date_short(&sample(), &Locale::new("en-US")), "3/7/24, 2:05 PM");
        assert_eq!(f.format_date_short(&sample(), &Locale::new("en-GB")), "07/03/2024, 14:05");
        assert_eq!(f.format_date_short(&sample(), &Locale::new("de-DE")), "07.03.24, 14:05");
        assert_eq!(f.format_date_short(&sample(), &Locale::new("xx")), "2024-03-07 14:05");
    }

    #[test]
    fn timestamp_short_is_time_on_same_day() {
        let f = ShortFormatter::new().with_now(Utc.with_ymd_and_hms(2024, 3, 7, 23, 0, 0).unwrap());
        assert_eq!(f.format_timestamp_short(&sample(), &Locale::new("nb-NO")), "14:05");
    }

    #[test]
    fn timestamp_short_is_date_on_other_days() {
        let f = ShortFormatter::new().with_now(Utc.with_ymd_and_hms(2024, 3, 8, 1, 0, 0).unwrap());
        assert_eq!(f.format_timestamp_short(&sample(), &Locale::new("nb-NO")), "07.03.2024");
    }

    #[test]
    fn offset_shifts_the_day() {
        let plus_ten = FixedOffset::east_opt(10 * 3600).unwrap();
        let f = ShortFormatter::new()
            .with_offset(plus_ten)
            .with_now(Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap());
        // 00:05 on the 8th locally; local "now" is 22:00 on the 7th.
        assert_eq!(f.format_timestamp_short(&sample(), &Locale::new("ja-JP")), "2024/03/08");
    }
}
