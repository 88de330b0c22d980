use crate::core::calculator::intervals::{LivePolicy, reconstruct_intervals};
use crate::core::calculator::meals::resolve_meals;
use crate::core::calculator::status::classify;
use crate::models::action::ClockAction;
use crate::models::shift::{MealPeriod, ShiftSummary, WorkInterval};
use crate::models::time_entry::TimeEntry;
use chrono::Duration;

pub struct Core;

impl Core {
    /// Reconstruct one worker's shift from a sorted, deduplicated entry list.
    pub fn build_shift_summary(entries: &[TimeEntry], policy: LivePolicy) -> ShiftSummary {
        let rec = reconstruct_intervals(entries, policy);
        let meals = resolve_meals(entries, &rec.intervals, policy);

        let total_worked_ms = worked_ms(&rec.intervals, &meals.meals);

        let mut warnings = rec.warnings;
        warnings.extend(meals.warnings.iter().cloned());

        ShiftSummary {
            meal1: meals.meal(0),
            meal2: meals.meal(1),
            total_worked_ms,
            first_clock_in: entries
                .iter()
                .find(|e| e.action == ClockAction::ClockIn)
                .map(|e| e.timestamp),
            last_clock_out: entries
                .iter()
                .rev()
                .find(|e| e.action == ClockAction::ClockOut)
                .map(|e| e.timestamp),
            status: classify(entries),
            intervals: rec.intervals,
            warnings,
        }
    }
}

/// Worked time: interval time minus the part of each meal that falls inside
/// an interval, never negative. Explicit meals sit inside an interval and
/// are subtracted in full; inferred meals are gaps and subtract nothing.
pub fn worked_ms(intervals: &[WorkInterval], meals: &[MealPeriod]) -> i64 {
    let worked: Duration = intervals.iter().map(WorkInterval::duration).sum();
    let on_meal: Duration = meals
        .iter()
        .flat_map(|m| intervals.iter().map(move |i| i.overlap(m.start, m.end)))
        .sum();
    (worked - on_meal).num_milliseconds().max(0)
}
