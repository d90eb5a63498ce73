//! Timestamp formatting and parsing.
//!
//! All timestamps are local, timezone-naive date-times. The display format
//! has one-second resolution; the ledger keeps sub-second precision.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::{fs::Metadata, time::SystemTime};

/// Human-readable format embedded in the index page, e.g. `Fri Mar 21 12:59:18 2025`.
pub const DISPLAY_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Format used by the ledger (microsecond precision).
pub const LEDGER_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// ISO-like formats accepted as a fallback, tried in order.
const ISO_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
];

/// Current local time.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Render a timestamp in [`DISPLAY_FORMAT`].
pub fn format_display(ts: NaiveDateTime) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}

/// Render a timestamp in [`LEDGER_FORMAT`].
pub fn format_ledger(ts: NaiveDateTime) -> String {
    ts.format(LEDGER_FORMAT).to_string()
}

/// Parse a recorded timestamp.
///
/// Tries [`DISPLAY_FORMAT`] first, then ISO-8601-like text (`T` separator and
/// trailing `Z` tolerated, date-only accepted as midnight).
pub fn parse_recorded(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, DISPLAY_FORMAT)
        .ok()
        .or_else(|| parse_iso(s))
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    let normalized = s.replacen('T', " ", 1);
    let normalized = normalized.trim_end_matches('Z');
    ISO_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(normalized, fmt).ok().or_else(|| {
            NaiveDate::parse_from_str(normalized, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
    })
}

/// Convert a filesystem time to a local naive timestamp.
pub fn from_system_time(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}

/// Modification time of a file as a local naive timestamp.
pub fn modified(meta: &Metadata) -> std::io::Result<NaiveDateTime> {
    meta.modified().map(from_system_time)
}
