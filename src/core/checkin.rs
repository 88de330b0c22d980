//! Check-in code handling shared by device clock actions and offline sync.

use crate::db::codes::{find_code, record_checkin};
use crate::db::workers::get_worker;
use crate::errors::{AppError, AppResult};
use crate::models::checkin_code::CheckinCode;
use crate::utils::tz::local_date;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use rusqlite::Connection;
use std::sync::LazyLock;

static CODE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{4,12}$").expect("static regex"));

/// Trim and uppercase a code, then check its format.
pub fn normalize_code(raw: &str) -> AppResult<String> {
    let code = raw.trim().to_uppercase();
    if CODE_FORMAT.is_match(&code) {
        Ok(code)
    } else {
        Err(AppError::InvalidCode(format!(
            "'{}' must be 4 to 12 letters or digits",
            raw.trim()
        )))
    }
}

/// Normalize, look up and require an active code.
pub fn resolve_code(conn: &Connection, raw: &str) -> AppResult<CheckinCode> {
    let code = normalize_code(raw)?;
    let found = find_code(conn, &code)?.ok_or_else(|| AppError::CodeNotFound(code.clone()))?;
    if !found.is_active {
        return Err(AppError::InvalidCode(format!("'{}' is inactive", code)));
    }
    Ok(found)
}

/// Payroll division of a worker, falling back to the configured default.
pub fn resolve_division(conn: &Connection, worker_id: i64, default: &str) -> AppResult<String> {
    let worker = get_worker(conn, worker_id)?;
    Ok(worker.division.unwrap_or_else(|| default.to_string()))
}

/// Write the check-in log row for the first clock-in of a code on a local day.
pub fn record_first_checkin(
    conn: &Connection,
    code: &CheckinCode,
    worker_id: i64,
    at: &DateTime<Utc>,
    tz: Tz,
    source: &str,
) -> AppResult<bool> {
    record_checkin(conn, code.id, worker_id, &local_date(tz, at), at, source)
}
