use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::{status_report, totals_report};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::formatting::{local_hm, ms2readable, pad_right};
use crate::utils::time::parse_instant;
use chrono::Utc;

/// `totals`: historical payroll read.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Totals {
        event,
        workers,
        json,
    } = cmd
    {
        let tz = cfg.tz()?;
        let pool = DbPool::open(&cfg.database)?;
        let report = totals_report(&pool.conn, *event, workers, tz)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("=== Event {} | {} ===", report.event_id, report.summary.date_queried);
        println!(
            "{} {} {} {} {} {}",
            pad_right("WORKER", 8),
            pad_right("IN", 6),
            pad_right("OUT", 6),
            pad_right("MEAL 1", 12),
            pad_right("MEAL 2", 12),
            "WORKED"
        );
        for w in &report.workers {
            println!(
                "{} {} {} {} {} {}",
                pad_right(&w.worker_id.to_string(), 8),
                pad_right(&local_hm(w.first_clock_in, tz), 6),
                pad_right(&local_hm(w.last_clock_out, tz), 6),
                pad_right(&format!("{}-{}", local_hm(w.meal1.start, tz), local_hm(w.meal1.end, tz)), 12),
                pad_right(&format!("{}-{}", local_hm(w.meal2.start, tz), local_hm(w.meal2.end, tz)), 12),
                ms2readable(w.total_worked_ms)
            );
        }
        println!(
            "\nWorkers: {} | Entries found: {}",
            report.summary.worker_count, report.summary.entries_found
        );
    }
    Ok(())
}

/// `status`: live attendance read.
pub fn handle_status(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status {
        event,
        workers,
        now,
        json,
    } = cmd
    {
        let tz = cfg.tz()?;
        let now = match now {
            Some(s) => parse_instant(s)?,
            None => Utc::now(),
        };
        let pool = DbPool::open(&cfg.database)?;
        let report = status_report(&pool.conn, *event, workers, tz, now)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("=== Event {} | as of {} ===", report.event_id, local_hm(Some(report.now), tz));
        for w in &report.workers {
            println!(
                "{} {} {}",
                pad_right(&w.worker_id.to_string(), 8),
                pad_right(w.status.as_str(), 12),
                ms2readable(w.total_worked_ms)
            );
        }
    }
    Ok(())
}
