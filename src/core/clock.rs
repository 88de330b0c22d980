//! Live, device-originated clock actions entered through a check-in code.

use crate::core::checkin::{record_first_checkin, resolve_code, resolve_division};
use crate::db::events::event_exists;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::insert_entry;
use crate::errors::{AppError, AppResult};
use crate::models::action::ClockAction;
use crate::models::time_entry::TimeEntry;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub struct ClockRequest {
    pub code: String,
    pub action: ClockAction,
    /// Required with a shared code, must match the bound worker otherwise.
    pub worker_id: Option<i64>,
    pub event_id: Option<i64>,
    pub at: DateTime<Utc>,
}

pub struct ClockLogic;

impl ClockLogic {
    /// Insert one clock action; returns (worker id, entry id).
    pub fn apply(
        pool: &mut DbPool,
        tz: Tz,
        default_division: &str,
        req: &ClockRequest,
    ) -> AppResult<(i64, i64)> {
        let tx = pool.conn.transaction()?;

        let code = resolve_code(&tx, &req.code)?;
        let worker_id = match (code.target_worker_id, req.worker_id) {
            (Some(bound), Some(given)) if bound != given => {
                return Err(AppError::InvalidCode(format!(
                    "'{}' is bound to another worker",
                    code.code
                )));
            }
            (Some(bound), _) => bound,
            (None, Some(given)) => given,
            (None, None) => {
                return Err(AppError::Validation(format!(
                    "'{}' is a shared code: --worker is required",
                    code.code
                )));
            }
        };

        if let Some(event_id) = req.event_id
            && !event_exists(&tx, event_id)?
        {
            return Err(AppError::EventNotFound(event_id));
        }

        let division = resolve_division(&tx, worker_id, default_division)?;
        let entry = TimeEntry::new(
            worker_id,
            req.action,
            req.at,
            req.event_id,
            &division,
            Some("device".to_string()),
        );
        let entry_id = insert_entry(&tx, &entry)?;

        if req.action == ClockAction::ClockIn {
            record_first_checkin(&tx, &code, worker_id, &req.at, tz, "device")?;
        }

        ttlog_quiet(
            &tx,
            "clock",
            &format!("worker {worker_id}"),
            &format!("{} at {}", req.action, req.at.to_rfc3339()),
        );

        tx.commit()?;
        Ok((worker_id, entry_id))
    }
}
