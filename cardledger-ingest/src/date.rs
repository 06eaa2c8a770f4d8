//! Purchase-date normalization for header-keyed exports.
//!
//! Positional card exports keep their date text untouched; Venmo and Fidelity
//! write datetimes in several shapes and are folded to `MM/DD/YYYY`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

static US_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<m>\d{1,2})/(?P<d>\d{1,2})/(?P<y>\d{2,4})",
        r"(?:\s+\d{1,2}:\d{2}(?::\d{2})?\s*(?:[AaPp][Mm])?)?$"
    ))
    .expect("valid regex")
});

/// Parse `MM/DD/YYYY`, `MM/DD/YY` (optionally followed by a time) or ISO-8601.
pub fn parse_purchase_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = US_DATETIME.captures(s) {
        let month: u32 = caps["m"].parse().ok()?;
        let day: u32 = caps["d"].parse().ok()?;
        let mut year: i32 = caps["y"].parse().ok()?;
        if year < 100 {
            year += 2000;
        }
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// `MM/DD/YYYY` when the text is a recognised date, otherwise the trimmed text unchanged.
pub fn normalize_purchase_date(raw: &str) -> String {
    match parse_purchase_date(raw) {
        Some(date) => date.format("%m/%d/%Y").to_string(),
        None => raw.trim().to_string(),
    }
}
