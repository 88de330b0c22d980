//! Manual shift correction: local `HH:mm` checkpoints → validated instants
//! → atomic replace of the worker's day.

use crate::core::checkin::resolve_division;
use crate::db::events::{get_event, is_on_team};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::{DayReplace, replace_day_entries};
use crate::db::workers::find_worker;
use crate::errors::{AppError, AppResult};
use crate::models::action::ClockAction;
use crate::models::time_entry::TimeEntry;
use crate::utils::time::parse_time;
use crate::utils::tz::{day_window, local_hm_to_utc};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

/// The six editable wall-clock times of a shift, as entered (`HH:mm`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSpans {
    pub first_in: Option<String>,
    pub first_meal_start: Option<String>,
    pub last_meal_end: Option<String>,
    pub second_meal_start: Option<String>,
    pub second_meal_end: Option<String>,
    pub last_out: Option<String>,
}

impl EditSpans {
    /// Slots in shift order.
    fn slots(&self) -> [(&'static str, ClockAction, Option<&String>); 6] {
        [
            ("firstIn", ClockAction::ClockIn, self.first_in.as_ref()),
            ("firstMealStart", ClockAction::MealStart, self.first_meal_start.as_ref()),
            ("lastMealEnd", ClockAction::MealEnd, self.last_meal_end.as_ref()),
            ("secondMealStart", ClockAction::MealStart, self.second_meal_start.as_ref()),
            ("secondMealEnd", ClockAction::MealEnd, self.second_meal_end.as_ref()),
            ("lastOut", ClockAction::ClockOut, self.last_out.as_ref()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub field: &'static str,
    pub action: ClockAction,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EditRequest {
    pub actor_id: i64,
    pub worker_id: i64,
    pub event_id: i64,
    pub spans: EditSpans,
    pub expected_version: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub checkpoints: Vec<Checkpoint>,
    pub deleted: usize,
    pub version: i64,
}

fn is_set(v: Option<&String>) -> bool {
    v.is_some_and(|s| !s.trim().is_empty())
}

fn require_pair(start: Option<&String>, end: Option<&String>, label: &str, fields: &str) -> AppResult<()> {
    if is_set(start) != is_set(end) {
        return Err(AppError::Validation(format!(
            "{label} start and end are both required ({fields})"
        )));
    }
    Ok(())
}

/// Parse, order and validate the checkpoints of an edit for `date`.
///
/// A checkpoint at or before its predecessor is taken to have crossed
/// midnight and moves one day forward, together with everything after it.
/// That happens at most once per shift; any later drop is left in place and
/// rejected by the ordering check.
pub fn build_checkpoints(spans: &EditSpans, date: NaiveDate, tz: Tz) -> AppResult<Vec<Checkpoint>> {
    require_pair(
        spans.first_meal_start.as_ref(),
        spans.last_meal_end.as_ref(),
        "Meal 1",
        "firstMealStart / lastMealEnd",
    )?;
    require_pair(
        spans.second_meal_start.as_ref(),
        spans.second_meal_end.as_ref(),
        "Meal 2",
        "secondMealStart / secondMealEnd",
    )?;

    let mut checkpoints = Vec::new();
    for (field, action, value) in spans.slots() {
        let Some(raw) = value.filter(|s| !s.trim().is_empty()) else {
            continue;
        };
        let time = parse_time(raw)
            .ok_or_else(|| AppError::InvalidTime(format!("{field}: '{raw}' is not HH:mm")))?;
        checkpoints.push(Checkpoint {
            field,
            action,
            at: local_hm_to_utc(tz, date, time),
        });
    }

    if checkpoints.is_empty() {
        return Err(AppError::Validation("no times supplied".into()));
    }

    let mut shift = Duration::zero();
    for i in 1..checkpoints.len() {
        checkpoints[i].at += shift;
        if shift.is_zero() && checkpoints[i].at <= checkpoints[i - 1].at {
            shift = Duration::hours(24);
            checkpoints[i].at += shift;
        }
    }

    for w in checkpoints.windows(2) {
        if w[1].at <= w[0].at {
            return Err(AppError::Validation(format!(
                "times must be strictly increasing ({} is not after {})",
                w[1].field, w[0].field
            )));
        }
    }

    if let (Some(first), Some(last)) = (checkpoints.first(), checkpoints.last())
        && last.at - first.at >= Duration::hours(24)
    {
        return Err(AppError::Validation(
            "a shift cannot span 24 hours or more".into(),
        ));
    }

    Ok(checkpoints)
}

pub struct EditLogic;

impl EditLogic {
    /// Authorize, validate and atomically replace the worker's day.
    pub fn apply(
        pool: &mut DbPool,
        tz: Tz,
        default_division: &str,
        req: &EditRequest,
    ) -> AppResult<EditOutcome> {
        let actor = find_worker(&pool.conn, req.actor_id)?
            .ok_or_else(|| AppError::Unauthorized(format!("unknown actor {}", req.actor_id)))?;
        if !actor.role.can_edit_shifts() {
            return Err(AppError::Unauthorized(format!(
                "role '{}' cannot edit shifts",
                actor.role.to_db_str()
            )));
        }

        let event = get_event(&pool.conn, req.event_id)?;
        if !is_on_team(&pool.conn, event.id, req.worker_id)? {
            return Err(AppError::WorkerNotOnTeam {
                worker: req.worker_id,
                event: event.id,
            });
        }
        let division = resolve_division(&pool.conn, req.worker_id, default_division)?;

        let checkpoints = build_checkpoints(&req.spans, event.date, tz)?;

        let note = format!("manual edit by {}", actor.id);
        let entries: Vec<TimeEntry> = checkpoints
            .iter()
            .map(|c| {
                TimeEntry::new(
                    req.worker_id,
                    c.action,
                    c.at,
                    Some(event.id),
                    &division,
                    Some(note.clone()),
                )
            })
            .collect();

        let (deleted, version) = replace_day_entries(
            pool,
            &DayReplace {
                worker_id: req.worker_id,
                event_id: event.id,
                day: event.date,
                window: day_window(tz, event.date, true),
                entries: &entries,
                expected_version: req.expected_version,
            },
        )?;

        ttlog_quiet(
            &pool.conn,
            "edit",
            &format!("worker {} / event {}", req.worker_id, event.id),
            &format!(
                "{} by {}: replaced {} entries with {} (version {})",
                event.date_str(),
                actor.id,
                deleted,
                entries.len(),
                version
            ),
        );

        Ok(EditOutcome {
            checkpoints,
            deleted,
            version,
        })
    }
}
