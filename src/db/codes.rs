//! Check-in code store and check-in log.

use crate::errors::AppResult;
use crate::models::checkin_code::CheckinCode;
use crate::utils::time::to_db_instant;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};

pub fn insert_code(conn: &Connection, code: &str, is_active: bool, target: Option<i64>) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO checkin_codes (code, is_active, target_worker_id) VALUES (?1, ?2, ?3)",
        params![code, if is_active { 1 } else { 0 }, target],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Look a code up by its normalized text.
pub fn find_code(conn: &Connection, code: &str) -> AppResult<Option<CheckinCode>> {
    let found = conn
        .query_row(
            "SELECT id, code, is_active, target_worker_id FROM checkin_codes WHERE code = ?1",
            [code],
            |row| {
                Ok(CheckinCode {
                    id: row.get(0)?,
                    code: row.get(1)?,
                    is_active: row.get::<_, i32>(2)? == 1,
                    target_worker_id: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(found)
}

/// Record a check-in unless one already exists for this code, worker and
/// local day. Returns true when a row was written.
pub fn record_checkin(
    conn: &Connection,
    code_id: i64,
    worker_id: i64,
    day: &NaiveDate,
    at: &DateTime<Utc>,
    source: &str,
) -> AppResult<bool> {
    let day_str = day.format("%Y-%m-%d").to_string();
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM checkin_log WHERE code_id = ?1 AND worker_id = ?2 AND day = ?3",
    )?;
    if chk.exists(params![code_id, worker_id, day_str])? {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO checkin_log (code_id, worker_id, day, checked_in_at, source)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![code_id, worker_id, day_str, to_db_instant(at), source],
    )?;
    Ok(true)
}

pub fn count_checkins(conn: &Connection, code_id: i64) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM checkin_log WHERE code_id = ?1",
        [code_id],
        |row| row.get(0),
    )?;
    Ok(n)
}
