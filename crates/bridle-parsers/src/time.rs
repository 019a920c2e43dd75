//! Timestamp and duration parsing for scheduler output.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};

/// Parse an ISO-style timestamp (YYYY-MM-DDTHH:MM:SS).
///
/// Returns None for empty strings and placeholder values.
pub fn parse_iso_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "N/A" {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .and_then(|dt| Utc.from_local_datetime(&dt).single())
}

/// Parse a C-locale timestamp (Thu Mar 14 13:10:02 2024), the format the
/// accounting tools print.
pub fn parse_ctime(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, "%a %b %e %H:%M:%S %Y")
        .ok()
        .and_then(|dt| Utc.from_local_datetime(&dt).single())
}

/// Parse a month/day timestamp with no year (mm/dd-HH:MM:SS), assuming the
/// current year the way the listing tools' own displays do.
pub fn parse_slash_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    let current_year = Utc::now().year();
    NaiveDateTime::parse_from_str(
        &format!("{}/{}", current_year, trimmed),
        "%Y/%m/%d-%H:%M:%S",
    )
    .ok()
    .and_then(|dt| Utc.from_local_datetime(&dt).single())
}

/// Parse an elapsed clock value (HHH:MM:SS or MM:SS) into whole seconds,
/// tolerating a fractional-second suffix.
pub fn parse_clock_duration(s: &str) -> Option<u64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    let clean = trimmed.split('.').next().unwrap_or(trimmed);
    let parts: Option<Vec<u64>> = clean.split(':').map(|p| p.parse().ok()).collect();
    let parts = parts?;
    match parts.len() {
        3 => Some(parts[0] * 3600 + parts[1] * 60 + parts[2]),
        2 => Some(parts[0] * 60 + parts[1]),
        1 => Some(parts[0]),
        _ => None,
    }
}

/// Parse whole seconds, tolerating a fractional suffix (accounting tools
/// print wallclock as "127.000").
pub fn parse_seconds(s: &str) -> Option<u64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    trimmed.split('.').next()?.parse().ok()
}

/// Interpret a raw epoch-seconds value as a timestamp.
pub fn parse_epoch_seconds(s: &str) -> Option<DateTime<Utc>> {
    let secs: i64 = s.trim().parse().ok()?;
    Utc.timestamp_opt(secs, 0).single()
}
