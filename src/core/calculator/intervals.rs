//! Shift reconstruction: pairs clock-in / clock-out actions into work
//! intervals.

use crate::models::action::ClockAction;
use crate::models::shift::{ShiftWarning, WorkInterval};
use crate::models::time_entry::TimeEntry;
use chrono::{DateTime, Utc};

/// How a clock-in (or meal start) still open at the end of the stream is
/// accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivePolicy {
    /// Live status / monitoring: open spans run up to `now`.
    Live { now: DateTime<Utc> },
    /// Historical payroll: open spans contribute nothing.
    Closed,
}

impl LivePolicy {
    pub fn now(&self) -> Option<DateTime<Utc>> {
        match self {
            LivePolicy::Live { now } => Some(*now),
            LivePolicy::Closed => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    pub intervals: Vec<WorkInterval>,
    pub warnings: Vec<ShiftWarning>,
}

/// Rebuild work intervals from one worker's chronologically sorted entries.
///
/// A second clock-in while one is open is ignored (the first wins); a
/// clock-out with nothing open is ignored. Both are reported as warnings.
pub fn reconstruct_intervals(entries: &[TimeEntry], policy: LivePolicy) -> Reconstruction {
    let mut out = Reconstruction::default();
    let mut open: Option<DateTime<Utc>> = None;

    for e in entries {
        match e.action {
            ClockAction::ClockIn => {
                if open.is_some() {
                    out.warnings
                        .push(ShiftWarning::DanglingClockIn { at: e.timestamp });
                } else {
                    open = Some(e.timestamp);
                }
            }
            ClockAction::ClockOut => match open.take() {
                Some(start) => {
                    if e.timestamp > start {
                        out.intervals.push(WorkInterval {
                            start,
                            end: e.timestamp,
                        });
                    }
                }
                None => out
                    .warnings
                    .push(ShiftWarning::DanglingClockOut { at: e.timestamp }),
            },
            ClockAction::MealStart | ClockAction::MealEnd => {}
        }
    }

    if let Some(start) = open {
        match policy {
            LivePolicy::Live { now } => {
                if now > start {
                    out.intervals.push(WorkInterval { start, end: now });
                }
            }
            LivePolicy::Closed => out.warnings.push(ShiftWarning::DanglingClockIn { at: start }),
        }
    }

    out
}
