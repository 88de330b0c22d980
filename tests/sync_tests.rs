mod common;
use chrono_tz::America::Los_Angeles;
use common::{count_entries, seeded_pool, ts};
use rtimeclock::core::attestation::{ClockOutFacts, verify};
use rtimeclock::core::report::totals_report;
use rtimeclock::core::sync::{OFFLINE_ORIGIN, SyncBatch, SyncReconciler, SyncResponse};
use rtimeclock::db::attestations::attestations_for_worker;
use rtimeclock::db::codes::{count_checkins, find_code};
use rtimeclock::db::pool::DbPool;
use rtimeclock::utils::time::to_db_instant;
use serde_json::json;
use std::time::Duration;

fn batch(actions: serde_json::Value) -> SyncBatch {
    serde_json::from_value(json!({ "actions": actions })).expect("valid batch")
}

fn run(pool: &mut DbPool, b: SyncBatch) -> SyncResponse {
    SyncReconciler::new(pool, Los_Angeles, "GENERAL", Duration::from_secs(30)).run(b)
}

fn error_of<'a>(resp: &'a SyncResponse, local_id: &str) -> &'a str {
    resp.results
        .iter()
        .find(|r| r.local_id == local_id)
        .and_then(|r| r.error.as_deref())
        .unwrap_or("")
}

#[test]
fn test_batch_is_replayed_in_timestamp_order() {
    let mut pool = seeded_pool();
    let b = batch(json!([
        { "localId": "out", "code": "alpha1", "action": "clock_out", "timestamp": "2025-06-10T23:00:00Z", "eventId": 1 },
        { "localId": "in", "code": "ALPHA1", "action": "clock_in", "timestamp": "2025-06-10T08:00:00-07:00", "eventId": 1 },
        { "localId": "meal", "code": "ALPHA1", "action": "meal_start", "timestamp": "2025-06-10T19:00:00Z", "eventId": 1 },
        { "localId": "back", "code": "ALPHA1", "action": "meal_end", "timestamp": "2025-06-10T19:30:00Z", "eventId": 1 }
    ]));

    let resp = run(&mut pool, b);

    assert_eq!(resp.synced, 4);
    assert_eq!(resp.failed, 0);
    let order: Vec<&str> = resp.results.iter().map(|r| r.local_id.as_str()).collect();
    assert_eq!(order, vec!["in", "meal", "back", "out"]);

    let report = totals_report(&pool.conn, 1, &[1], Los_Angeles).expect("totals");
    assert_eq!(report.workers[0].total_worked_ms, 27_000_000);
}

#[test]
fn test_shared_code_is_rejected() {
    let mut pool = seeded_pool();
    let b = batch(json!([
        { "localId": "x", "code": "SHARED1", "action": "clock_in", "timestamp": "2025-06-10T15:00:00Z" }
    ]));

    let resp = run(&mut pool, b);

    assert_eq!(resp.failed, 1);
    assert!(error_of(&resp, "x").contains("shared code"));
    let total: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM time_entries", [], |r| r.get(0))
        .expect("count");
    assert_eq!(total, 0);
}

#[test]
fn test_bad_items_fail_alone() {
    let mut pool = seeded_pool();
    let b = batch(json!([
        { "localId": "ok1", "code": "ALPHA1", "action": "clock_in", "timestamp": "2025-06-10T15:00:00Z" },
        { "localId": "inactive", "code": "OLDCODE", "action": "clock_in", "timestamp": "2025-06-10T15:01:00Z" },
        { "localId": "unknown", "code": "ZZZZ99", "action": "clock_in", "timestamp": "2025-06-10T15:02:00Z" },
        { "localId": "format", "code": "a!", "action": "clock_in", "timestamp": "2025-06-10T15:03:00Z" },
        { "localId": "action", "code": "ALPHA1", "action": "lunch", "timestamp": "2025-06-10T15:04:00Z" },
        { "localId": "when", "code": "ALPHA1", "action": "clock_out", "timestamp": "yesterday" },
        { "localId": "event", "code": "ALPHA1", "action": "clock_out", "timestamp": "2025-06-10T16:00:00Z", "eventId": 99 },
        { "localId": "ok2", "code": "bravo2", "action": "clock_in", "timestamp": "2025-06-10T15:05:00Z" }
    ]));

    let resp = run(&mut pool, b);

    assert_eq!(resp.synced, 2);
    assert_eq!(resp.failed, 6);
    assert!(error_of(&resp, "inactive").contains("inactive"));
    assert!(error_of(&resp, "unknown").contains("not found"));
    assert!(error_of(&resp, "format").contains("4 to 12"));
    assert!(error_of(&resp, "action").contains("lunch"));
    assert!(error_of(&resp, "when").contains("yesterday"));
    assert!(error_of(&resp, "event").contains("Event 99"));
    // the malformed timestamp sorts last
    assert_eq!(resp.results.last().map(|r| r.local_id.as_str()), Some("when"));

    assert_eq!(count_entries(&pool, 1), 1);
    assert_eq!(count_entries(&pool, 3), 1);
}

#[test]
fn test_signed_clock_out_is_attested() {
    let mut pool = seeded_pool();
    let b = batch(json!([
        { "localId": "in", "code": "ALPHA1", "action": "clock_in", "timestamp": "2025-06-10T15:00:00Z", "eventId": 1 },
        { "localId": "out", "code": "ALPHA1", "action": "clock_out", "timestamp": "2025-06-10T23:00:00Z",
          "eventId": 1, "signature": "data:image/png;base64,AAAA" }
    ]));

    let resp = run(&mut pool, b);
    assert_eq!(resp.synced, 2);

    let stored = attestations_for_worker(&pool.conn, 1).expect("attestations");
    assert_eq!(stored.len(), 1);
    let a = &stored[0];
    assert_eq!(a.signed_at, ts("2025-06-10T23:00:00Z"));
    assert!(a.entry_id.is_some());

    let facts = ClockOutFacts {
        worker_id: 1,
        code: "ALPHA1",
        action: "clock_out",
        timestamp: to_db_instant(&ts("2025-06-10T23:00:00Z")),
        division: "KITCHEN",
        event_id: Some(1),
    };
    assert!(verify(a, &facts, "data:image/png;base64,AAAA", OFFLINE_ORIGIN));
    assert!(!verify(a, &facts, "data:image/png;base64,BBBB", OFFLINE_ORIGIN));

    let tampered = ClockOutFacts {
        division: "OFFICE",
        ..facts
    };
    assert!(!verify(a, &tampered, "data:image/png;base64,AAAA", OFFLINE_ORIGIN));
}

#[test]
fn test_unsigned_clock_out_has_no_attestation() {
    let mut pool = seeded_pool();
    let b = batch(json!([
        { "localId": "out", "code": "ALPHA1", "action": "clock_out", "timestamp": "2025-06-10T23:00:00Z" }
    ]));

    run(&mut pool, b);

    assert!(attestations_for_worker(&pool.conn, 1).expect("attestations").is_empty());
    assert_eq!(count_entries(&pool, 1), 1);
}

#[test]
fn test_first_clock_in_of_the_day_is_logged_once() {
    let mut pool = seeded_pool();
    let b = batch(json!([
        { "localId": "a", "code": "ALPHA1", "action": "clock_in", "timestamp": "2025-06-10T15:00:00Z" },
        { "localId": "b", "code": "ALPHA1", "action": "clock_out", "timestamp": "2025-06-10T19:00:00Z" },
        { "localId": "c", "code": "ALPHA1", "action": "clock_in", "timestamp": "2025-06-10T19:30:00Z" },
        { "localId": "d", "code": "ALPHA1", "action": "clock_in", "timestamp": "2025-06-11T15:00:00Z" }
    ]));

    let resp = run(&mut pool, b);
    assert_eq!(resp.synced, 4);

    let code = find_code(&pool.conn, "ALPHA1").expect("lookup").expect("code");
    assert_eq!(count_checkins(&pool.conn, code.id).expect("count"), 2);
}

#[test]
fn test_expired_deadline_fails_remaining_items() {
    let mut pool = seeded_pool();
    let b = batch(json!([
        { "localId": "a", "code": "ALPHA1", "action": "clock_in", "timestamp": "2025-06-10T15:00:00Z" },
        { "localId": "b", "code": "ALPHA1", "action": "clock_out", "timestamp": "2025-06-10T19:00:00Z" }
    ]));

    let resp = SyncReconciler::new(&mut pool, Los_Angeles, "GENERAL", Duration::ZERO).run(b);

    assert_eq!(resp.synced, 0);
    assert!(error_of(&resp, "a").contains("deadline"));
    assert_eq!(count_entries(&pool, 1), 0);
}

#[test]
fn test_resubmitted_signed_clock_out_keeps_one_attestation() {
    let mut pool = seeded_pool();
    let signed_out = json!([
        { "localId": "out", "code": "ALPHA1", "action": "clock_out", "timestamp": "2025-06-10T23:00:00Z",
          "eventId": 1, "signature": "sig" }
    ]);

    let first = run(&mut pool, batch(signed_out.clone()));
    let second = run(&mut pool, batch(signed_out));

    assert_eq!(first.synced, 1);
    assert_eq!(second.synced, 1);
    assert!(second.results[0].success);
    assert_eq!(count_entries(&pool, 1), 2);
    assert_eq!(attestations_for_worker(&pool.conn, 1).expect("attestations").len(), 1);

    let failures: i64 = pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM log WHERE operation = 'attestation_failed'",
            [],
            |r| r.get(0),
        )
        .expect("count");
    assert_eq!(failures, 1);
}

#[test]
fn test_corrupt_attestation_instant_is_an_error() {
    let mut pool = seeded_pool();
    run(
        &mut pool,
        batch(json!([
            { "localId": "out", "code": "ALPHA1", "action": "clock_out", "timestamp": "2025-06-10T23:00:00Z",
              "signature": "sig" }
        ])),
    );
    pool.conn
        .execute("UPDATE attestations SET signed_at = 'not a time'", [])
        .expect("corrupt row");

    assert!(attestations_for_worker(&pool.conn, 1).is_err());
}
