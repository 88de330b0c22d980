use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::{EditLogic, EditRequest, EditSpans};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Manually correct a worker's shift for one event.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        actor,
        event,
        worker,
        first_in,
        first_meal_start,
        last_meal_end,
        second_meal_start,
        second_meal_end,
        last_out,
        expect_version,
    } = cmd
    {
        let tz = cfg.tz()?;
        let mut pool = DbPool::open(&cfg.database)?;

        let req = EditRequest {
            actor_id: *actor,
            worker_id: *worker,
            event_id: *event,
            spans: EditSpans {
                first_in: first_in.clone(),
                first_meal_start: first_meal_start.clone(),
                last_meal_end: last_meal_end.clone(),
                second_meal_start: second_meal_start.clone(),
                second_meal_end: second_meal_end.clone(),
                last_out: last_out.clone(),
            },
            expected_version: *expect_version,
        };

        let outcome = EditLogic::apply(&mut pool, tz, &cfg.default_division, &req)?;

        for c in &outcome.checkpoints {
            info(format!(
                "{:<16} {} ({})",
                c.field,
                c.at.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z"),
                c.action
            ));
        }
        success(format!(
            "✏️ Shift updated for worker {}: {} entries replaced by {} (version {}).",
            worker,
            outcome.deleted,
            outcome.checkpoints.len(),
            outcome.version
        ));
    }
    Ok(())
}
