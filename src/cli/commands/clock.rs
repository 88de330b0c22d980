use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::{ClockLogic, ClockRequest};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::action::ClockAction;
use crate::ui::messages::success;
use crate::utils::time::parse_instant;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Clock {
        code,
        action,
        worker,
        event,
        at,
    } = cmd
    {
        let action =
            ClockAction::parse(action).ok_or_else(|| AppError::InvalidAction(action.clone()))?;
        let at = match at {
            Some(s) => parse_instant(s)?,
            None => Utc::now(),
        };

        let mut pool = DbPool::open(&cfg.database)?;
        let (worker_id, _) = ClockLogic::apply(
            &mut pool,
            cfg.tz()?,
            &cfg.default_division,
            &ClockRequest {
                code: code.clone(),
                action,
                worker_id: *worker,
                event_id: *event,
                at,
            },
        )?;

        success(format!("Recorded {} for worker {} at {}.", action, worker_id, at.to_rfc3339()));
    }
    Ok(())
}
