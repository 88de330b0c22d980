use serde::{Deserialize, Serialize};

/// A single clock action recorded by a worker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ClockAction {
    ClockIn,
    ClockOut,
    MealStart,
    MealEnd,
}

impl ClockAction {
    /// Parse user input (case-insensitive, accepts `-` or `_`).
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_db_str(&s.trim().to_lowercase().replace('-', "_"))
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ClockAction::ClockIn => "clock_in",
            ClockAction::ClockOut => "clock_out",
            ClockAction::MealStart => "meal_start",
            ClockAction::MealEnd => "meal_end",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "clock_in" => Some(ClockAction::ClockIn),
            "clock_out" => Some(ClockAction::ClockOut),
            "meal_start" => Some(ClockAction::MealStart),
            "meal_end" => Some(ClockAction::MealEnd),
            _ => None,
        }
    }

    pub fn is_meal_marker(&self) -> bool {
        matches!(self, ClockAction::MealStart | ClockAction::MealEnd)
    }
}

impl std::fmt::Display for ClockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_db_str())
    }
}
