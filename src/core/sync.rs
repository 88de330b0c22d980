//! Offline sync: replays client-queued clock actions against the store.
//!
//! Items are applied in original-timestamp order and each one succeeds or
//! fails on its own; a bad item never aborts the batch. Only personal codes
//! are accepted, because a replayed action has no other way to identify the
//! worker.
//!
//! The protocol carries no idempotency key: submitting the same batch twice
//! inserts its entries twice.

use crate::core::attestation::{ClockOutFacts, attest};
use crate::core::checkin::{record_first_checkin, resolve_code, resolve_division};
use crate::db::attestations::insert_attestation;
use crate::db::events::event_exists;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::insert_entry;
use crate::errors::{AppError, AppResult};
use crate::models::action::ClockAction;
use crate::models::time_entry::TimeEntry;
use crate::utils::time::{parse_instant, to_db_instant};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rusqlite::Transaction;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Origin tag bound into signature hashes and entry notes.
pub const OFFLINE_ORIGIN: &str = "offline_sync";

/// One queued action as sent by the client. Fields stay raw so a malformed
/// item fails alone instead of rejecting the whole request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncAction {
    pub local_id: String,
    pub code: String,
    pub action: String,
    pub timestamp: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub event_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncBatch {
    pub actions: Vec<SyncAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncItemResult {
    pub local_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncResponse {
    pub synced: usize,
    pub failed: usize,
    pub results: Vec<SyncItemResult>,
}

pub struct SyncReconciler<'a> {
    pool: &'a mut DbPool,
    tz: Tz,
    default_division: String,
    timeout: Duration,
}

impl<'a> SyncReconciler<'a> {
    pub fn new(pool: &'a mut DbPool, tz: Tz, default_division: &str, timeout: Duration) -> Self {
        Self {
            pool,
            tz,
            default_division: default_division.to_string(),
            timeout,
        }
    }

    /// Replay a batch. Store errors on one item are reported on that item.
    pub fn run(&mut self, batch: SyncBatch) -> SyncResponse {
        let deadline = Instant::now() + self.timeout;

        // unparseable timestamps sort last; they fail anyway
        let mut items: Vec<(Option<DateTime<Utc>>, SyncAction)> = batch
            .actions
            .into_iter()
            .map(|a| (parse_instant(&a.timestamp).ok(), a))
            .collect();
        items.sort_by_key(|(ts, _)| (ts.is_none(), *ts));

        let mut results = Vec::with_capacity(items.len());
        for (ts, item) in items {
            let outcome = if Instant::now() >= deadline {
                Err(AppError::Other("sync deadline exceeded".into()))
            } else {
                self.apply_item(&item, ts)
            };

            match outcome {
                Ok(()) => results.push(SyncItemResult {
                    local_id: item.local_id,
                    success: true,
                    error: None,
                }),
                Err(e) => {
                    tracing::warn!(local_id = %item.local_id, "offline action rejected: {e}");
                    results.push(SyncItemResult {
                        local_id: item.local_id,
                        success: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let synced = results.iter().filter(|r| r.success).count();
        let failed = results.len() - synced;
        ttlog_quiet(
            &self.pool.conn,
            "sync",
            "offline batch",
            &format!("{synced} synced, {failed} failed"),
        );

        SyncResponse {
            synced,
            failed,
            results,
        }
    }

    fn apply_item(&mut self, item: &SyncAction, ts: Option<DateTime<Utc>>) -> AppResult<()> {
        let ts = ts.ok_or_else(|| AppError::InvalidTime(item.timestamp.clone()))?;
        let action = ClockAction::parse(&item.action)
            .ok_or_else(|| AppError::InvalidAction(item.action.clone()))?;

        let mut tx = self.pool.conn.transaction()?;

        let code = resolve_code(&tx, &item.code)?;
        let worker_id = code.target_worker_id.ok_or_else(|| {
            AppError::InvalidCode(format!(
                "'{}' is a shared code; shared codes cannot be used for offline sync",
                code.code
            ))
        })?;

        if let Some(event_id) = item.event_id
            && !event_exists(&tx, event_id)?
        {
            return Err(AppError::EventNotFound(event_id));
        }

        let division = resolve_division(&tx, worker_id, &self.default_division)?;

        let entry = TimeEntry::new(
            worker_id,
            action,
            ts,
            item.event_id,
            &division,
            Some(format!("offline sync ({})", item.local_id)),
        );
        let entry_id = insert_entry(&tx, &entry)?;

        match action {
            ClockAction::ClockIn => {
                record_first_checkin(&tx, &code, worker_id, &ts, self.tz, OFFLINE_ORIGIN)?;
            }
            ClockAction::ClockOut => {
                if let Some(sig) = item.signature.as_deref().filter(|s| !s.is_empty()) {
                    let facts = ClockOutFacts {
                        worker_id,
                        code: &code.code,
                        action: action.to_db_str(),
                        timestamp: to_db_instant(&ts),
                        division: &division,
                        event_id: item.event_id,
                    };
                    store_attestation(&mut tx, &facts, sig, &ts, entry_id);
                }
            }
            ClockAction::MealStart | ClockAction::MealEnd => {}
        }

        tx.commit()?;
        Ok(())
    }
}

/// Persist an attestation inside a savepoint. A failure is logged and
/// rolled back without touching the clock-out itself.
fn store_attestation(
    tx: &mut Transaction<'_>,
    facts: &ClockOutFacts<'_>,
    signature: &str,
    ts: &DateTime<Utc>,
    entry_id: i64,
) {
    let attestation = attest(facts, signature, ts, OFFLINE_ORIGIN, Some(entry_id));

    let result = tx.savepoint().map_err(AppError::from).and_then(|sp| {
        insert_attestation(&sp, &attestation)?;
        sp.commit()?;
        Ok(())
    });

    if let Err(e) = result {
        tracing::warn!(
            worker_id = facts.worker_id,
            entry_id,
            "failed to persist clock-out attestation: {e}"
        );
        ttlog_quiet(
            tx,
            "attestation_failed",
            &format!("entry {entry_id}"),
            &e.to_string(),
        );
    }
}
