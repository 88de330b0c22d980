//! Append-only attestation store.

use crate::errors::{AppError, AppResult};
use crate::models::attestation::Attestation;
use crate::utils::time::{from_db_instant, to_db_instant};
use chrono::Utc;
use rusqlite::{Connection, params};

pub fn insert_attestation(conn: &Connection, a: &Attestation) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO attestations
             (entry_id, worker_id, form_data_hash, signature_hash, binding_hash, signed_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            a.entry_id,
            a.worker_id,
            a.form_data_hash,
            a.signature_hash,
            a.binding_hash,
            to_db_instant(&a.signed_at),
            to_db_instant(&Utc::now()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn attestations_for_worker(conn: &Connection, worker_id: i64) -> AppResult<Vec<Attestation>> {
    let mut stmt = conn.prepare_cached(
        "SELECT entry_id, worker_id, form_data_hash, signature_hash, binding_hash, signed_at
         FROM attestations WHERE worker_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([worker_id], |row| {
        let signed: String = row.get(5)?;
        let signed_at = from_db_instant(&signed).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidTime(signed.clone())),
            )
        })?;
        Ok(Attestation {
            entry_id: row.get(0)?,
            worker_id: row.get(1)?,
            form_data_hash: row.get(2)?,
            signature_hash: row.get(3)?,
            binding_hash: row.get(4)?,
            signed_at,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
