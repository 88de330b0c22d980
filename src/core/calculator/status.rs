use crate::models::action::ClockAction;
use crate::models::shift::ShiftStatus;
use crate::models::time_entry::TimeEntry;

/// Attendance state from the chronologically last action.
pub fn classify(entries: &[TimeEntry]) -> ShiftStatus {
    match entries.iter().max_by_key(|e| e.timestamp).map(|e| e.action) {
        Some(ClockAction::ClockIn) | Some(ClockAction::MealEnd) => ShiftStatus::ClockedIn,
        Some(ClockAction::MealStart) => ShiftStatus::OnMeal,
        Some(ClockAction::ClockOut) | None => ShiftStatus::ClockedOut,
    }
}
