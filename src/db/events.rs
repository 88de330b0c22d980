use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_event(row: &Row) -> rusqlite::Result<Event> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let parse_hm = |idx: usize, col: &str| -> rusqlite::Result<NaiveTime> {
        let s: String = row.get(col)?;
        NaiveTime::parse_from_str(&s, "%H:%M").map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidTime(s.clone())),
            )
        })
    };

    Ok(Event {
        id: row.get("id")?,
        name: row.get("name")?,
        date,
        start_time: parse_hm(3, "start_time")?,
        end_time: parse_hm(4, "end_time")?,
        crosses_midnight: row.get::<_, i32>("crosses_midnight")? == 1,
    })
}

/// Insert an event and its team; returns the event id.
pub fn insert_event(conn: &Connection, ev: &Event, team: &[i64]) -> AppResult<i64> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO events (name, date, start_time, end_time, crosses_midnight)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            ev.name,
            ev.date_str(),
            ev.start_time.format("%H:%M").to_string(),
            ev.end_time.format("%H:%M").to_string(),
            if ev.crosses_midnight { 1 } else { 0 },
        ],
    )?;
    let id = tx.last_insert_rowid();

    for worker in team {
        tx.execute(
            "INSERT OR IGNORE INTO event_team (event_id, worker_id) VALUES (?1, ?2)",
            params![id, worker],
        )?;
    }
    tx.commit()?;
    Ok(id)
}

pub fn get_event(conn: &Connection, id: i64) -> AppResult<Event> {
    conn.query_row(
        "SELECT id, name, date, start_time, end_time, crosses_midnight FROM events WHERE id = ?1",
        [id],
        map_event,
    )
    .optional()?
    .ok_or(AppError::EventNotFound(id))
}

pub fn event_exists(conn: &Connection, id: i64) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM events WHERE id = ?1")?;
    Ok(stmt.exists([id])?)
}

/// Worker ids assigned to an event, ascending.
pub fn event_team(conn: &Connection, event_id: i64) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare_cached(
        "SELECT worker_id FROM event_team WHERE event_id = ?1 ORDER BY worker_id ASC",
    )?;
    let rows = stmt.query_map([event_id], |row| row.get::<_, i64>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn is_on_team(conn: &Connection, event_id: i64, worker_id: i64) -> AppResult<bool> {
    let mut stmt =
        conn.prepare_cached("SELECT 1 FROM event_team WHERE event_id = ?1 AND worker_id = ?2")?;
    Ok(stmt.exists(params![event_id, worker_id])?)
}
