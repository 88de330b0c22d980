use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// A scheduled event (work day) that entries may be tagged to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,        // ⇔ events.date (TEXT "YYYY-MM-DD")
    pub start_time: NaiveTime,  // ⇔ events.start_time (TEXT "HH:MM")
    pub end_time: NaiveTime,    // ⇔ events.end_time (TEXT "HH:MM")
    pub crosses_midnight: bool, // ⇔ events.crosses_midnight (INT 0/1)
}

impl Event {
    pub fn window(&self) -> EventWindow {
        EventWindow {
            event_id: self.id,
            date: self.date,
            crosses_midnight: self.crosses_midnight,
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// What the normalizer needs to know about an event to select entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    pub event_id: i64,
    pub date: NaiveDate,
    pub crosses_midnight: bool,
}
