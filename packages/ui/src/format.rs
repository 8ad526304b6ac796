//! Display formatting for backend values. Anything missing renders `N/A`;
//! anything unparseable renders as sent.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const NOT_AVAILABLE: &str = "N/A";

pub fn or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn parse(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `12 Mar 2024, 14:05`
pub fn datetime(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => NOT_AVAILABLE.to_string(),
        Some(v) => parse(v)
            .map(|dt| dt.format("%d %b %Y, %H:%M").to_string())
            .unwrap_or_else(|| v.to_string()),
    }
}

/// `12 Mar 2024`
pub fn date(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => NOT_AVAILABLE.to_string(),
        Some(v) => parse(v)
            .map(|dt| dt.format("%d %b %Y").to_string())
            .unwrap_or_else(|| v.to_string()),
    }
}
