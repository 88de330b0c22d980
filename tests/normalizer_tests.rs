mod common;
use common::{event_on, seeded_pool, stored, tagged, ts};
use rtimeclock::core::normalizer::{collect_entries, dedupe_sorted, merge_strategies};
use rtimeclock::core::report::totals_report;
use rtimeclock::db::events::insert_event;
use rtimeclock::db::queries::insert_entry;
use rtimeclock::errors::AppError;
use rtimeclock::models::action::ClockAction::*;
use rtimeclock::models::event::EventWindow;
use rtimeclock::models::time_entry::TimeEntry;
use rusqlite::params;

fn window(crosses_midnight: bool) -> EventWindow {
    EventWindow {
        event_id: 1,
        date: chrono::NaiveDate::from_ymd_opt(2025, 6, 10).expect("date"),
        crosses_midnight,
    }
}

fn ids(entries: &[TimeEntry]) -> Vec<Option<i64>> {
    entries.iter().map(|e| e.id).collect()
}

#[test]
fn test_merge_dedupes_rows_found_twice() {
    let a = vec![
        stored(1, 7, ClockIn, "2025-06-10T15:00:00Z", Some(1)),
        stored(2, 7, ClockOut, "2025-06-10T23:00:00Z", Some(1)),
    ];
    let b = vec![
        stored(2, 7, ClockOut, "2025-06-10T23:00:00Z", Some(1)),
        stored(3, 7, MealStart, "2025-06-10T19:00:00Z", None),
    ];

    let merged = merge_strategies(&window(false), a, Some(b), None);

    assert_eq!(ids(&merged), vec![Some(1), Some(3), Some(2)]);
}

#[test]
fn test_merge_dedupes_unstored_rows_by_natural_key() {
    let e = tagged(7, ClockIn, "2025-06-10T15:00:00Z", 1);
    let merged = dedupe_sorted(vec![e.clone(), e]);
    assert_eq!(merged.len(), 1);
}

#[test]
fn test_crossing_window_drops_rows_of_other_events() {
    let a = vec![stored(1, 7, ClockIn, "2025-06-11T05:00:00Z", Some(1))];
    let b = vec![
        stored(1, 7, ClockIn, "2025-06-11T05:00:00Z", Some(1)),
        stored(2, 7, ClockIn, "2025-06-11T08:00:00Z", Some(99)),
        stored(3, 7, ClockOut, "2025-06-11T09:00:00Z", None),
    ];

    let merged = merge_strategies(&window(true), a, Some(b), None);

    assert_eq!(ids(&merged), vec![Some(1), Some(3)]);
}

#[test]
fn test_started_at_fallback_only_when_nothing_else_found() {
    let legacy = vec![stored(9, 7, ClockIn, "2025-06-10T15:00:00Z", None)];

    let merged = merge_strategies(&window(false), vec![], Some(vec![]), Some(legacy.clone()));
    assert_eq!(ids(&merged), vec![Some(9)]);

    let a = vec![stored(1, 7, ClockIn, "2025-06-10T16:00:00Z", Some(1))];
    let merged = merge_strategies(&window(false), a, None, Some(legacy));
    assert_eq!(ids(&merged), vec![Some(1)]);
}

#[test]
fn test_ties_keep_store_order() {
    let merged = dedupe_sorted(vec![
        stored(5, 7, ClockOut, "2025-06-10T15:00:00Z", None),
        stored(4, 7, ClockIn, "2025-06-10T15:00:00Z", None),
    ]);
    assert_eq!(ids(&merged), vec![Some(4), Some(5)]);
}

#[test]
fn test_collect_decides_strategy_per_worker() {
    let pool = seeded_pool();
    let conn = &pool.conn;

    // worker 1: tagged rows hide the untagged stray
    insert_entry(conn, &tagged(1, ClockIn, "2025-06-10T15:00:00Z", 1)).expect("insert");
    insert_entry(conn, &tagged(1, ClockOut, "2025-06-10T23:00:00Z", 1)).expect("insert");
    insert_entry(conn, &common::entry(1, ClockIn, "2025-06-10T16:00:00Z")).expect("insert");

    // worker 3: only untagged rows inside the day
    insert_entry(conn, &common::entry(3, ClockIn, "2025-06-10T15:00:00Z")).expect("insert");
    insert_entry(conn, &common::entry(3, ClockOut, "2025-06-10T20:00:00Z")).expect("insert");
    // outside the local day (2025-06-11 00:30 in Los Angeles)
    insert_entry(conn, &common::entry(3, ClockIn, "2025-06-11T07:30:00Z")).expect("insert");

    // worker 2: a legacy row only reachable through started_at
    conn.execute(
        "INSERT INTO time_entries (worker_id, action, ts, started_at, event_id, division, note, created_at)
         VALUES (2, 'clock_in', ?1, ?2, NULL, 'OFFICE', NULL, ?1)",
        params!["2000-01-01T00:00:00.000Z", "2025-06-10T16:00:00.000Z"],
    )
    .expect("legacy row");

    let found = collect_entries(conn, &[1, 2, 3], &window(false), chrono_tz::America::Los_Angeles)
        .expect("collect");

    assert_eq!(found.entries_for(1).len(), 2);
    assert_eq!(found.entries_for(3).len(), 2);
    let legacy = found.entries_for(2);
    assert_eq!(legacy.len(), 1);
    assert_eq!(legacy[0].timestamp, ts("2025-06-10T16:00:00Z"));
    assert_eq!(found.entries_found(), 5);
}

#[test]
fn test_collect_returns_every_requested_worker() {
    let pool = seeded_pool();
    let found = collect_entries(&pool.conn, &[1, 2], &window(false), chrono_tz::America::Los_Angeles)
        .expect("collect");

    assert_eq!(found.per_worker.len(), 2);
    assert!(found.entries_for(1).is_empty());
    assert_eq!(found.entries_found(), 0);
}

#[test]
fn test_overnight_event_includes_untagged_rows_after_midnight() {
    let pool = seeded_pool();
    let conn = &pool.conn;
    let night = insert_event(conn, &event_on("2025-06-10", true), &[1]).expect("event");

    // 22:00 local, tagged
    insert_entry(conn, &tagged(1, ClockIn, "2025-06-11T05:00:00Z", night)).expect("insert");
    // 02:00 local on the next day, untagged
    insert_entry(conn, &common::entry(1, ClockOut, "2025-06-11T09:00:00Z")).expect("insert");
    // belongs to another event
    insert_entry(conn, &tagged(1, MealStart, "2025-06-11T08:00:00Z", 2)).expect("insert");

    let report = totals_report(conn, night, &[], chrono_tz::America::Los_Angeles).expect("totals");

    assert_eq!(report.workers.len(), 1);
    assert_eq!(report.workers[0].total_worked_ms, 4 * 3_600_000);
    assert_eq!(report.summary.entries_found, 2);
    assert!(report.workers[0].meal1.start.is_none());
}

#[test]
fn test_totals_reject_workers_outside_the_team() {
    let pool = seeded_pool();
    let conn = &pool.conn;
    // worker 3 works event 2, same day as event 1
    insert_entry(conn, &tagged(3, ClockIn, "2025-06-10T16:00:00Z", 2)).expect("insert");
    insert_entry(conn, &tagged(3, ClockOut, "2025-06-10T20:00:00Z", 2)).expect("insert");

    let err = totals_report(conn, 1, &[3], chrono_tz::America::Los_Angeles).unwrap_err();
    assert!(matches!(err, AppError::WorkerNotOnTeam { worker: 3, event: 1 }));

    let err = totals_report(conn, 1, &[1, 999], chrono_tz::America::Los_Angeles).unwrap_err();
    assert!(matches!(err, AppError::WorkerNotFound(999)));

    let report = totals_report(conn, 2, &[3], chrono_tz::America::Los_Angeles).expect("totals");
    assert_eq!(report.summary.worker_count, 1);
    assert_eq!(report.workers[0].total_worked_ms, 4 * 3_600_000);
}
