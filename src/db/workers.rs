use crate::errors::{AppError, AppResult};
use crate::models::worker::{Role, Worker};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_worker(row: &Row) -> rusqlite::Result<Worker> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidRole(role_str.clone())),
        )
    })?;
    Ok(Worker {
        id: row.get("id")?,
        name: row.get("name")?,
        division: row.get("division")?,
        role,
    })
}

/// Insert or update a worker record.
pub fn upsert_worker(conn: &Connection, w: &Worker) -> AppResult<()> {
    conn.execute(
        "INSERT INTO workers (id, name, division, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             division = excluded.division,
             role = excluded.role",
        params![
            w.id,
            w.name,
            w.division,
            w.role.to_db_str(),
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn find_worker(conn: &Connection, id: i64) -> AppResult<Option<Worker>> {
    let w = conn
        .query_row(
            "SELECT id, name, division, role FROM workers WHERE id = ?1",
            [id],
            map_worker,
        )
        .optional()?;
    Ok(w)
}

pub fn get_worker(conn: &Connection, id: i64) -> AppResult<Worker> {
    find_worker(conn, id)?.ok_or(AppError::WorkerNotFound(id))
}
