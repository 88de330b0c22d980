//! Event stream normalizer: one chronological, deduplicated entry list per
//! worker for an event window, whichever way the entries were recorded.
//!
//! Entries reach the store through three paths that tag them differently:
//! - (a) tagged with the event id;
//! - (b) untagged (or tagged elsewhere) but timestamped inside the event's
//!   day window; fetched when (a) is empty or the event crosses midnight;
//! - (c) legacy rows whose instant only lives in `started_at`; fetched when
//!   both (a) and (b) came back empty.
//!
//! Strategy decisions are taken per worker, so one worker with tagged rows
//! does not hide another worker's untagged rows.

use crate::db::queries::{entries_by_event, entries_in_window, entries_started_in_window};
use crate::errors::AppResult;
use crate::models::event::EventWindow;
use crate::models::time_entry::{EntryKey, TimeEntry};
use crate::utils::tz::day_window;
use chrono_tz::Tz;
use rusqlite::Connection;
use std::collections::{BTreeMap, HashSet};

/// Normalized entries for a set of workers.
#[derive(Debug, Default, Clone)]
pub struct NormalizedEntries {
    pub per_worker: BTreeMap<i64, Vec<TimeEntry>>,
}

impl NormalizedEntries {
    pub fn entries_found(&self) -> usize {
        self.per_worker.values().map(Vec::len).sum()
    }

    pub fn entries_for(&self, worker_id: i64) -> &[TimeEntry] {
        self.per_worker
            .get(&worker_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Merge the result sets of the three strategies for ONE worker.
///
/// `by_window` is `None` when strategy (b) was not run, `by_started` is
/// `None` when strategy (c) was not run.
pub fn merge_strategies(
    window: &EventWindow,
    by_event: Vec<TimeEntry>,
    by_window: Option<Vec<TimeEntry>>,
    by_started: Option<Vec<TimeEntry>>,
) -> Vec<TimeEntry> {
    let mut merged = by_event;

    if let Some(rows) = by_window {
        if window.crosses_midnight {
            // the extended window overlaps the next day's events
            merged.extend(
                rows.into_iter()
                    .filter(|e| e.event_id.is_none_or(|id| id == window.event_id)),
            );
        } else {
            merged.extend(rows);
        }
    }

    if merged.is_empty()
        && let Some(rows) = by_started
    {
        merged = rows;
    }

    dedupe_sorted(merged)
}

/// Drop repeated rows (by id, else by worker/action/timestamp) and sort
/// chronologically. Ties keep store order (id ascending).
pub fn dedupe_sorted(entries: Vec<TimeEntry>) -> Vec<TimeEntry> {
    let mut seen: HashSet<EntryKey> = HashSet::with_capacity(entries.len());
    let mut out: Vec<TimeEntry> = entries
        .into_iter()
        .filter(|e| seen.insert(e.dedupe_key()))
        .collect();
    out.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
    out
}

fn group_by_worker(rows: Vec<TimeEntry>) -> BTreeMap<i64, Vec<TimeEntry>> {
    let mut map: BTreeMap<i64, Vec<TimeEntry>> = BTreeMap::new();
    for e in rows {
        map.entry(e.worker_id).or_default().push(e);
    }
    map
}

/// Fetch and normalize the entries of `workers` for an event window.
/// Every requested worker appears in the result, possibly with no entries.
pub fn collect_entries(
    conn: &Connection,
    workers: &[i64],
    window: &EventWindow,
    tz: Tz,
) -> AppResult<NormalizedEntries> {
    let (start, end) = day_window(tz, window.date, window.crosses_midnight);

    let mut by_event = group_by_worker(entries_by_event(conn, workers, window.event_id)?);

    let need_window: Vec<i64> = workers
        .iter()
        .copied()
        .filter(|w| window.crosses_midnight || by_event.get(w).is_none_or(Vec::is_empty))
        .collect();
    let mut by_window = group_by_worker(entries_in_window(conn, &need_window, &start, &end)?);

    let need_started: Vec<i64> = need_window
        .iter()
        .copied()
        .filter(|w| {
            by_event.get(w).is_none_or(Vec::is_empty) && by_window.get(w).is_none_or(Vec::is_empty)
        })
        .collect();
    let mut by_started =
        group_by_worker(entries_started_in_window(conn, &need_started, &start, &end)?);

    let mut per_worker = BTreeMap::new();
    for w in workers {
        let a = by_event.remove(w).unwrap_or_default();
        let b = need_window
            .contains(w)
            .then(|| by_window.remove(w).unwrap_or_default());
        let c = need_started
            .contains(w)
            .then(|| by_started.remove(w).unwrap_or_default());
        per_worker.insert(*w, merge_strategies(window, a, b, c));
    }

    Ok(NormalizedEntries { per_worker })
}
