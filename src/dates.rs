//! Lenient date handling for backend timestamps.
//!
//! Anything that does not parse is treated as absent. Nothing here returns
//! an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Placeholder shown for missing dates
pub const NO_DATE: &str = "—";

/// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS` or a plain
/// `YYYY-MM-DD` date. Naive values are read as UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse an optional raw value
pub fn parse_opt(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(parse_datetime)
}

/// True only when the deadline parses and lies strictly before `now`
pub fn is_expired(deadline: Option<&str>, now: DateTime<Utc>) -> bool {
    parse_opt(deadline).is_some_and(|d| d < now)
}

/// Whole days left until the deadline, negative once it has passed
pub fn days_until(deadline: Option<&str>, now: DateTime<Utc>) -> Option<i64> {
    parse_opt(deadline).map(|d| (d - now).num_days())
}

/// Hungarian short date, e.g. `2024.08.15.`
pub fn format_hu_date(raw: Option<&str>) -> String {
    match parse_opt(raw) {
        Some(dt) => dt.format("%Y.%m.%d.").to_string(),
        None => NO_DATE.to_string(),
    }
}
