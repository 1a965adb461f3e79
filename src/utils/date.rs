//! Date helpers for blog posts, the feed and computed context entries.

use crate::context::Value;
use chrono::{Local, NaiveDate, NaiveTime, SecondsFormat};

/// Format of the `published` front matter field: `day.month.year`.
pub const PUBLISHED_FORMAT: &str = "%d.%m.%Y";

/// Parse a `published` value.
///
/// Accepts `day.month.year` strings (`3.7.2014`, `03.07.2014`) and YAML dates
/// (`2014-07-03`). Everything else yields `None`.
pub fn parse_published(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(date) => Some(*date),
        Value::String(s) => NaiveDate::parse_from_str(s.trim(), PUBLISHED_FORMAT).ok(),
        _ => None,
    }
}

/// RFC 2822 timestamp at midnight UTC, as used by rss `pubDate`.
pub fn to_rfc2822(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN).and_utc().to_rfc2822()
}

/// Current local time, RFC 3339.
pub fn now_rfc3339() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Current local date in the `published` format.
pub fn today() -> String {
    Local::now().date_naive().format(PUBLISHED_FORMAT).to_string()
}
