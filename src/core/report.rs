//! Read paths: historical payroll totals and live attendance status.
//! Both run the same normalizer and reconstruction, only the policy differs.

use crate::core::calculator::intervals::LivePolicy;
use crate::core::logic::Core;
use crate::core::normalizer::collect_entries;
use crate::db::events::{event_team, get_event, is_on_team};
use crate::db::workers::get_worker;
use crate::errors::{AppError, AppResult};
use crate::models::event::Event;
use crate::models::shift::{MealPeriod, ShiftStatus, ShiftSummary, ShiftWarning};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MealSpan {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl From<Option<MealPeriod>> for MealSpan {
    fn from(m: Option<MealPeriod>) -> Self {
        match m {
            Some(m) => MealSpan {
                start: Some(m.start),
                end: Some(m.end),
            },
            None => MealSpan::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerTotals {
    pub worker_id: i64,
    pub total_worked_ms: i64,
    pub first_clock_in: Option<DateTime<Utc>>,
    pub last_clock_out: Option<DateTime<Utc>>,
    pub meal1: MealSpan,
    pub meal2: MealSpan,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ShiftWarning>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsSummary {
    pub worker_count: usize,
    pub entries_found: usize,
    pub date_queried: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsReport {
    pub event_id: i64,
    pub workers: Vec<WorkerTotals>,
    pub summary: TotalsSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStatus {
    pub worker_id: i64,
    pub status: ShiftStatus,
    pub total_worked_ms: i64,
    pub first_clock_in: Option<DateTime<Utc>>,
    pub meal1: MealSpan,
    pub meal2: MealSpan,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub event_id: i64,
    pub now: DateTime<Utc>,
    pub workers: Vec<WorkerStatus>,
}

/// Worker set for a query: the explicit list, or the event's team.
/// Every explicitly requested worker must exist and be on the team.
fn worker_set(conn: &Connection, event: &Event, requested: &[i64]) -> AppResult<Vec<i64>> {
    if requested.is_empty() {
        return event_team(conn, event.id);
    }

    let mut v = requested.to_vec();
    v.sort_unstable();
    v.dedup();
    for &worker in &v {
        get_worker(conn, worker)?;
        if !is_on_team(conn, event.id, worker)? {
            return Err(AppError::WorkerNotOnTeam {
                worker,
                event: event.id,
            });
        }
    }
    Ok(v)
}

fn summarize(
    conn: &Connection,
    event: &Event,
    workers: &[i64],
    tz: Tz,
    policy: LivePolicy,
) -> AppResult<(Vec<(i64, ShiftSummary)>, usize)> {
    let normalized = collect_entries(conn, workers, &event.window(), tz)?;

    let mut out = Vec::with_capacity(workers.len());
    for (worker_id, entries) in &normalized.per_worker {
        let summary = Core::build_shift_summary(entries, policy);
        for w in &summary.warnings {
            tracing::warn!(worker_id, event_id = event.id, ?w, "data-quality anomaly in entry stream");
        }
        out.push((*worker_id, summary));
    }
    Ok((out, normalized.entries_found()))
}

/// Historical totals: open clock-ins and open meals count for nothing.
pub fn totals_report(
    conn: &Connection,
    event_id: i64,
    requested: &[i64],
    tz: Tz,
) -> AppResult<TotalsReport> {
    let event = get_event(conn, event_id)?;
    let workers = worker_set(conn, &event, requested)?;
    let (summaries, entries_found) = summarize(conn, &event, &workers, tz, LivePolicy::Closed)?;

    let workers: Vec<WorkerTotals> = summaries
        .into_iter()
        .map(|(worker_id, s)| WorkerTotals {
            worker_id,
            total_worked_ms: s.total_worked_ms,
            first_clock_in: s.first_clock_in,
            last_clock_out: s.last_clock_out,
            meal1: s.meal1.into(),
            meal2: s.meal2.into(),
            warnings: s.warnings,
        })
        .collect();

    Ok(TotalsReport {
        event_id,
        summary: TotalsSummary {
            worker_count: workers.len(),
            entries_found,
            date_queried: event.date,
        },
        workers,
    })
}

/// Live status: open spans run up to `now`.
pub fn status_report(
    conn: &Connection,
    event_id: i64,
    requested: &[i64],
    tz: Tz,
    now: DateTime<Utc>,
) -> AppResult<StatusReport> {
    let event = get_event(conn, event_id)?;
    let workers = worker_set(conn, &event, requested)?;
    let (summaries, _) = summarize(conn, &event, &workers, tz, LivePolicy::Live { now })?;

    Ok(StatusReport {
        event_id,
        now,
        workers: summaries
            .into_iter()
            .map(|(worker_id, s)| WorkerStatus {
                worker_id,
                status: s.status,
                total_worked_ms: s.total_worked_ms,
                first_clock_in: s.first_clock_in,
                meal1: s.meal1.into(),
                meal2: s.meal2.into(),
            })
            .collect(),
    })
}
