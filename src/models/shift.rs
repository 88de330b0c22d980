use crate::models::action::ClockAction;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// A reconstructed clock-in → clock-out span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WorkInterval {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Length of the overlap between this interval and `[start, end)`.
    pub fn overlap(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
        let s = self.start.max(start);
        let e = self.end.min(end);
        if e > s { e - s } else { Duration::zero() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSource {
    Explicit,
    Inferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MealPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(skip)]
    pub source: MealSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    ClockedIn,
    OnMeal,
    #[default]
    ClockedOut,
}

impl ShiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::ClockedIn => "clocked_in",
            ShiftStatus::OnMeal => "on_meal",
            ShiftStatus::ClockedOut => "clocked_out",
        }
    }
}

/// Data-quality anomaly recovered locally during reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShiftWarning {
    DanglingClockIn { at: DateTime<Utc> },
    DanglingClockOut { at: DateTime<Utc> },
    DanglingMarker { action: ClockAction, at: DateTime<Utc> },
    ReversedMeal { start: DateTime<Utc>, end: DateTime<Utc> },
}

/// Derived per-worker view over one query window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShiftSummary {
    pub intervals: Vec<WorkInterval>,
    pub meal1: Option<MealPeriod>,
    pub meal2: Option<MealPeriod>,
    pub total_worked_ms: i64,
    pub first_clock_in: Option<DateTime<Utc>>,
    pub last_clock_out: Option<DateTime<Utc>>,
    pub status: ShiftStatus,
    pub warnings: Vec<ShiftWarning>,
}
