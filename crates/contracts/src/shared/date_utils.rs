//! Timestamp parsing and the relative "time ago" labels shown in the admin tables

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse the timestamps the backend sends. RFC 3339 is preferred; naive
/// date-times are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Relative label for `raw` as seen at `now`.
///
/// Buckets: under 5 s "Just now", then seconds, minutes, hours, days, each
/// floored. Timestamps in the future read "Just now"; unparseable input
/// reads "-".
pub fn time_ago(raw: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(raw) else {
        return "-".to_string();
    };

    let seconds = (now - then).num_milliseconds().div_euclid(1000);
    let minutes = seconds.div_euclid(60);
    let hours = minutes.div_euclid(60);
    let days = hours.div_euclid(24);

    if seconds < 5 {
        return "Just now".to_string();
    }
    if seconds < 60 {
        return format!("{} seconds ago", seconds);
    }
    if minutes < 60 {
        return format!("{} minute{} ago", minutes, plural(minutes));
    }
    if hours < 24 {
        return format!("{} hour{} ago", hours, plural(hours));
    }
    format!("{} day{} ago", days, plural(days))
}

pub fn time_ago_from_now(raw: &str) -> String {
    time_ago(raw, Utc::now())
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Format a backend timestamp as `DD.MM.YYYY HH:MM`. Unparseable input is
/// returned unchanged.
pub fn format_date_time(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%d.%m.%Y %H:%M").to_string(),
        None => raw.to_string(),
    }
}
