//! Meal period resolution: explicit markers first, gap inference otherwise.

use crate::core::calculator::intervals::LivePolicy;
use crate::models::action::ClockAction;
use crate::models::shift::{MealPeriod, MealSource, ShiftWarning, WorkInterval};
use crate::models::time_entry::TimeEntry;
use chrono::{DateTime, Utc};

/// At most this many meals are tracked per shift.
pub const MAX_MEALS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealResolution {
    pub meals: Vec<MealPeriod>,
    pub warnings: Vec<ShiftWarning>,
}

impl MealResolution {
    pub fn meal(&self, idx: usize) -> Option<MealPeriod> {
        self.meals.get(idx).copied()
    }
}

/// Resolve up to two meals for one worker's sorted entries.
///
/// When the stream holds any meal marker, only markers are used, even if
/// some of them are dangling; inference runs only on marker-free streams.
pub fn resolve_meals(
    entries: &[TimeEntry],
    intervals: &[WorkInterval],
    policy: LivePolicy,
) -> MealResolution {
    if entries.iter().any(|e| e.action.is_meal_marker()) {
        explicit_meals(entries, policy)
    } else {
        MealResolution {
            meals: infer_meals(intervals),
            warnings: Vec::new(),
        }
    }
}

fn explicit_meals(entries: &[TimeEntry], policy: LivePolicy) -> MealResolution {
    let starts: Vec<DateTime<Utc>> = marker_times(entries, ClockAction::MealStart);
    let ends: Vec<DateTime<Utc>> = marker_times(entries, ClockAction::MealEnd);

    let mut out = MealResolution::default();

    for k in 0..MAX_MEALS {
        match (starts.get(k), ends.get(k)) {
            (Some(&start), Some(&end)) if end > start => out.meals.push(MealPeriod {
                start,
                end,
                source: MealSource::Explicit,
            }),
            (Some(&start), Some(&end)) => out.warnings.push(ShiftWarning::ReversedMeal { start, end }),
            (Some(&start), None) => match policy.now() {
                Some(now) if now > start => out.meals.push(MealPeriod {
                    start,
                    end: now,
                    source: MealSource::Explicit,
                }),
                _ => out.warnings.push(ShiftWarning::DanglingMarker {
                    action: ClockAction::MealStart,
                    at: start,
                }),
            },
            (None, Some(&end)) => out.warnings.push(ShiftWarning::DanglingMarker {
                action: ClockAction::MealEnd,
                at: end,
            }),
            (None, None) => break,
        }
    }

    out
}

fn marker_times(entries: &[TimeEntry], action: ClockAction) -> Vec<DateTime<Utc>> {
    entries
        .iter()
        .filter(|e| e.action == action)
        .map(|e| e.timestamp)
        .collect()
}

/// The first two positive gaps between consecutive intervals.
pub fn infer_meals(intervals: &[WorkInterval]) -> Vec<MealPeriod> {
    if intervals.len() < 2 {
        return Vec::new();
    }

    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|i| i.start);

    sorted
        .windows(2)
        .filter(|w| w[1].start > w[0].end)
        .take(MAX_MEALS)
        .map(|w| MealPeriod {
            start: w[0].end,
            end: w[1].start,
            source: MealSource::Inferred,
        })
        .collect()
}
