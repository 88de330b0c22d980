//! Time-entry store: fetch strategies, insert and the transactional
//! replace of one worker's day.

use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::action::ClockAction;
use crate::models::time_entry::TimeEntry;
use crate::utils::time::{from_db_instant, to_db_instant};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};

const ENTRY_COLUMNS: &str = "id, worker_id, action, ts, started_at, event_id, division, note";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

pub fn map_row(row: &Row) -> Result<TimeEntry> {
    let action_str: String = row.get("action")?;
    let action = ClockAction::from_db_str(&action_str)
        .ok_or_else(|| conversion_error(2, AppError::InvalidAction(action_str.clone())))?;

    let ts_str: String = row.get("ts")?;
    let timestamp =
        from_db_instant(&ts_str).ok_or_else(|| conversion_error(3, AppError::InvalidTime(ts_str)))?;

    let started_at = match row.get::<_, Option<String>>("started_at")? {
        Some(s) => Some(from_db_instant(&s).ok_or_else(|| conversion_error(4, AppError::InvalidTime(s)))?),
        None => None,
    };

    Ok(TimeEntry {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        action,
        timestamp,
        started_at,
        event_id: row.get("event_id")?,
        division: row.get("division")?,
        note: row.get("note")?,
    })
}

/// `?, ?, ?` placeholders plus the matching values for an `IN (...)` list.
fn worker_list(workers: &[i64]) -> (String, Vec<Value>) {
    let placeholders = vec!["?"; workers.len()].join(",");
    let values = workers.iter().map(|w| Value::Integer(*w)).collect();
    (placeholders, values)
}

fn query_entries(conn: &Connection, sql: &str, values: Vec<Value>) -> AppResult<Vec<TimeEntry>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(values), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Strategy (a): entries explicitly tagged to `event_id`.
pub fn entries_by_event(conn: &Connection, workers: &[i64], event_id: i64) -> AppResult<Vec<TimeEntry>> {
    if workers.is_empty() {
        return Ok(Vec::new());
    }
    let (placeholders, mut values) = worker_list(workers);
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM time_entries
         WHERE worker_id IN ({placeholders}) AND event_id = ?
         ORDER BY ts ASC, id ASC"
    );
    values.push(Value::Integer(event_id));
    query_entries(conn, &sql, values)
}

/// Strategy (b): entries whose timestamp lies in `[start, end]`, whatever
/// event they are tagged to.
pub fn entries_in_window(
    conn: &Connection,
    workers: &[i64],
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> AppResult<Vec<TimeEntry>> {
    if workers.is_empty() {
        return Ok(Vec::new());
    }
    let (placeholders, mut values) = worker_list(workers);
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM time_entries
         WHERE worker_id IN ({placeholders}) AND ts BETWEEN ? AND ?
         ORDER BY ts ASC, id ASC"
    );
    values.push(Value::Text(to_db_instant(start)));
    values.push(Value::Text(to_db_instant(end)));
    query_entries(conn, &sql, values)
}

/// Strategy (c): entries whose secondary `started_at` lies in `[start, end]`,
/// timestamped by `started_at`.
pub fn entries_started_in_window(
    conn: &Connection,
    workers: &[i64],
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
) -> AppResult<Vec<TimeEntry>> {
    if workers.is_empty() {
        return Ok(Vec::new());
    }
    let (placeholders, mut values) = worker_list(workers);
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM time_entries
         WHERE worker_id IN ({placeholders}) AND started_at BETWEEN ? AND ?
         ORDER BY started_at ASC, id ASC"
    );
    values.push(Value::Text(to_db_instant(start)));
    values.push(Value::Text(to_db_instant(end)));

    // legacy rows are placed at their started_at instant
    let mut rows = query_entries(conn, &sql, values)?;
    for e in &mut rows {
        if let Some(s) = e.started_at {
            e.timestamp = s;
        }
    }
    Ok(rows)
}

/// Insert one entry and return its row id.
pub fn insert_entry(conn: &Connection, entry: &TimeEntry) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO time_entries (worker_id, action, ts, started_at, event_id, division, note, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    stmt.execute(params![
        entry.worker_id,
        entry.action.to_db_str(),
        to_db_instant(&entry.timestamp),
        entry.started_at.as_ref().map(to_db_instant),
        entry.event_id,
        entry.division,
        entry.note,
        to_db_instant(&Utc::now()),
    ])?;
    Ok(conn.last_insert_rowid())
}

/// Current version of a worker's day entry set (0 when never edited).
pub fn day_version(conn: &Connection, worker_id: i64, day: &NaiveDate) -> AppResult<i64> {
    let version: Option<i64> = conn
        .query_row(
            "SELECT version FROM day_versions WHERE worker_id = ?1 AND day = ?2",
            params![worker_id, day.format("%Y-%m-%d").to_string()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(version.unwrap_or(0))
}

/// The scope of one day replace.
pub struct DayReplace<'a> {
    pub worker_id: i64,
    pub event_id: i64,
    pub day: NaiveDate,
    /// Inclusive bounds of the deletion window.
    pub window: (DateTime<Utc>, DateTime<Utc>),
    pub entries: &'a [TimeEntry],
    pub expected_version: Option<i64>,
}

/// Atomically swap the entry set of one (worker, day).
///
/// Version check, delete, insert and version bump run in one immediate
/// transaction: either the whole new set is visible or the old one is.
/// Deleted rows are those of the worker inside the window that are tagged
/// to this event or untagged. Returns (deleted rows, new version).
pub fn replace_day_entries(pool: &mut DbPool, req: &DayReplace<'_>) -> AppResult<(usize, i64)> {
    let tx = pool.immediate()?;
    let day_str = req.day.format("%Y-%m-%d").to_string();

    let current = day_version(&tx, req.worker_id, &req.day)?;
    if let Some(expected) = req.expected_version
        && expected != current
    {
        return Err(AppError::VersionConflict {
            expected,
            found: current,
        });
    }

    let deleted = tx.execute(
        "DELETE FROM time_entries
         WHERE worker_id = ?1
           AND ts BETWEEN ?2 AND ?3
           AND (event_id = ?4 OR event_id IS NULL)",
        params![
            req.worker_id,
            to_db_instant(&req.window.0),
            to_db_instant(&req.window.1),
            req.event_id,
        ],
    )?;

    for entry in req.entries {
        insert_entry(&tx, entry)?;
    }

    let next = current + 1;
    tx.execute(
        "INSERT INTO day_versions (worker_id, day, version) VALUES (?1, ?2, ?3)
         ON CONFLICT(worker_id, day) DO UPDATE SET version = excluded.version",
        params![req.worker_id, day_str, next],
    )?;

    tx.commit()?;
    Ok((deleted, next))
}
