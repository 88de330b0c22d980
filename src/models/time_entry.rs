use super::action::ClockAction;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One immutable clock action row (`time_entries` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: Option<i64>,            // ⇔ time_entries.id (None until stored)
    pub worker_id: i64,             // ⇔ time_entries.worker_id
    pub action: ClockAction,        // ⇔ time_entries.action
    pub timestamp: DateTime<Utc>,   // ⇔ time_entries.ts (TEXT, RFC3339 UTC)
    pub started_at: Option<DateTime<Utc>>, // ⇔ time_entries.started_at (legacy rows)
    pub event_id: Option<i64>,      // ⇔ time_entries.event_id
    pub division: String,           // ⇔ time_entries.division
    pub note: Option<String>,       // ⇔ time_entries.note
}

impl TimeEntry {
    /// Build a new, not yet persisted entry.
    pub fn new(
        worker_id: i64,
        action: ClockAction,
        timestamp: DateTime<Utc>,
        event_id: Option<i64>,
        division: &str,
        note: Option<String>,
    ) -> Self {
        Self {
            id: None,
            worker_id,
            action,
            timestamp,
            started_at: None,
            event_id,
            division: division.to_string(),
            note,
        }
    }

    /// Identity used when the same row is returned by several fetch strategies.
    pub fn dedupe_key(&self) -> EntryKey {
        match self.id {
            Some(id) => EntryKey::Id(id),
            None => EntryKey::Natural(self.worker_id, self.action, self.timestamp),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKey {
    Id(i64),
    Natural(i64, ClockAction, DateTime<Utc>),
}
