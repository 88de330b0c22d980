//! Time utilities: parsing HH:MM and RFC3339 instants, storage form of instants.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveTime, SecondsFormat, Utc};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Parse an absolute instant (RFC3339, any offset) into UTC.
pub fn parse_instant(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidTime(s.to_string()))
}

/// Canonical storage form: UTC, millisecond precision, `Z` suffix.
/// Fixed width, so lexical order in SQLite equals chronological order.
pub fn to_db_instant(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn from_db_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
