//! Parsing helpers for epicenter and date fields.
//!
//! Dates are always interpreted in UTC so month buckets do not depend on
//! the time zone of the machine doing the aggregation.

use chrono::{DateTime, Datelike as _, NaiveDate, NaiveDateTime, Utc};

/// Extracts the region from an epicenter label: the text before the first
/// comma, trimmed. Labels without a comma are returned whole (trimmed).
#[must_use]
pub fn region_key(epicenter: &str) -> &str {
    epicenter
        .split_once(',')
        .map_or(epicenter, |(region, _)| region)
        .trim()
}

/// Parses a `date_ad` value into a UTC calendar date.
///
/// Accepts plain dates (`2025-02-25`, `2025/02/25`), naive datetimes
/// (`2025-02-25T10:30:00`, `2025-02-25 10:30:00`, optional fractional
/// seconds) taken as UTC, and RFC 3339 timestamps, which are converted to
/// UTC before the date is taken.
#[must_use]
pub fn parse_date_ad(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().date_naive());
        }
    }

    None
}

/// Formats a date as its `"YYYY-MM"` month key.
#[must_use]
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}
