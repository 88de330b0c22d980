//! `worker`, `event` and `code` commands: populate the stores the
//! reconciliation reads from.

use crate::cli::parser::{CodeCommand, Commands, EventCommand, WorkerCommand};
use crate::config::Config;
use crate::core::checkin::normalize_code;
use crate::db::codes::insert_code;
use crate::db::events::insert_event;
use crate::db::pool::DbPool;
use crate::db::workers::{get_worker, upsert_worker};
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::models::worker::{Role, Worker};
use crate::ui::messages::success;
use crate::utils::date::parse_date;
use crate::utils::time::parse_time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database)?;

    match cmd {
        Commands::Worker {
            action:
                WorkerCommand::Add {
                    id,
                    name,
                    division,
                    role,
                },
        } => {
            let role = Role::from_db_str(role).ok_or_else(|| AppError::InvalidRole(role.clone()))?;
            upsert_worker(
                &pool.conn,
                &Worker {
                    id: *id,
                    name: name.clone(),
                    division: division.clone(),
                    role,
                },
            )?;
            success(format!("Worker {} ({}) saved as {}.", id, name, role.to_db_str()));
        }

        Commands::Event {
            action:
                EventCommand::Add {
                    name,
                    date,
                    start,
                    end,
                    crosses_midnight,
                    team,
                },
        } => {
            let date = parse_date(date).ok_or_else(|| AppError::InvalidDate(date.clone()))?;
            let start_time = parse_time(start).ok_or_else(|| AppError::InvalidTime(start.clone()))?;
            let end_time = parse_time(end).ok_or_else(|| AppError::InvalidTime(end.clone()))?;
            for w in team {
                get_worker(&pool.conn, *w)?;
            }

            let ev = Event {
                id: 0,
                name: name.clone(),
                date,
                start_time,
                end_time,
                crosses_midnight: *crosses_midnight || end_time <= start_time,
            };
            let id = insert_event(&pool.conn, &ev, team)?;
            success(format!("Event {} created for {} (team of {}).", id, date, team.len()));
        }

        Commands::Code {
            action:
                CodeCommand::Add {
                    code,
                    worker,
                    inactive,
                },
        } => {
            let code = normalize_code(code)?;
            if let Some(w) = worker {
                get_worker(&pool.conn, *w)?;
            }
            insert_code(&pool.conn, &code, !*inactive, *worker)?;
            let kind = if worker.is_some() { "personal" } else { "shared" };
            success(format!("Created {} code {}.", kind, code));
        }

        _ => {}
    }

    Ok(())
}
