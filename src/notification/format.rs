//! Relative time labels for notification timestamps

use chrono::{DateTime, Datelike, Local, Utc};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;

/// Label a timestamp relative to `now`
///
/// "방금 전" under a minute, then minutes, hours and days; a week or more
/// falls back to a ko-KR style date ("2025. 11. 3."). Unparseable input is
/// returned unchanged.
pub fn format_relative(timestamp: &str, now: DateTime<Utc>) -> String {
    let time = match DateTime::parse_from_rfc3339(timestamp) {
        Ok(time) => time.with_timezone(&Utc),
        Err(_) => return timestamp.to_string(),
    };

    let diff = (now - time).num_milliseconds();
    let minutes = diff.div_euclid(MINUTE_MS);
    let hours = diff.div_euclid(HOUR_MS);
    let days = diff.div_euclid(DAY_MS);

    if minutes < 1 {
        "방금 전".to_string()
    } else if minutes < 60 {
        format!("{}분 전", minutes)
    } else if hours < 24 {
        format!("{}시간 전", hours)
    } else if days < 7 {
        format!("{}일 전", days)
    } else {
        let local = time.with_timezone(&Local);
        format!("{}. {}. {}.", local.year(), local.month(), local.day())
    }
}

/// [`format_relative`] against the current time
pub fn format_relative_now(timestamp: &str) -> String {
    format_relative(timestamp, Utc::now())
}
