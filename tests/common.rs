#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rtimeclock::db::codes::insert_code;
use rtimeclock::db::events::insert_event;
use rtimeclock::db::pool::DbPool;
use rtimeclock::db::workers::upsert_worker;
use rtimeclock::models::action::ClockAction;
use rtimeclock::models::event::Event;
use rtimeclock::models::time_entry::TimeEntry;
use rtimeclock::models::worker::{Role, Worker};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const TZ: &str = "America/Los_Angeles";

pub fn rtc() -> Command {
    cargo_bin_cmd!("rtimeclock")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimeclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary file path inside tempdir and ensure it's removed
pub fn temp_file(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimeclock.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC3339 in test")
        .with_timezone(&Utc)
}

/// Unstored entry at an RFC3339 instant.
pub fn entry(worker_id: i64, action: ClockAction, at: &str) -> TimeEntry {
    TimeEntry::new(worker_id, action, ts(at), None, "GENERAL", None)
}

/// Same as `entry`, tagged to an event.
pub fn tagged(worker_id: i64, action: ClockAction, at: &str, event_id: i64) -> TimeEntry {
    TimeEntry::new(worker_id, action, ts(at), Some(event_id), "GENERAL", None)
}

/// Stored entry with an explicit id, as returned by the store.
pub fn stored(id: i64, worker_id: i64, action: ClockAction, at: &str, event_id: Option<i64>) -> TimeEntry {
    let mut e = TimeEntry::new(worker_id, action, ts(at), event_id, "GENERAL", None);
    e.id = Some(id);
    e
}

pub fn worker(id: i64, role: Role, division: Option<&str>) -> Worker {
    Worker {
        id,
        name: format!("worker-{id}"),
        division: division.map(str::to_string),
        role,
    }
}

pub fn event_on(date: &str, crosses_midnight: bool) -> Event {
    Event {
        id: 0,
        name: "shift".to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date"),
        start_time: NaiveTime::from_hms_opt(8, 0, 0).expect("valid time"),
        end_time: NaiveTime::from_hms_opt(17, 0, 0).expect("valid time"),
        crosses_midnight,
    }
}

/// In-memory store with:
/// - worker 1 (worker, division KITCHEN), worker 2 (manager), worker 3 (worker, no division)
/// - event 1 on 2025-06-10 with team [1, 2], event 2 on the same day with team [3]
/// - codes: ALPHA1 → worker 1, BRAVO2 → worker 3, SHARED1 (shared), OLDCODE → worker 1 (inactive)
pub fn seeded_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("in-memory db");
    upsert_worker(&pool.conn, &worker(1, Role::Worker, Some("KITCHEN"))).expect("worker 1");
    upsert_worker(&pool.conn, &worker(2, Role::Manager, Some("OFFICE"))).expect("worker 2");
    upsert_worker(&pool.conn, &worker(3, Role::Worker, None)).expect("worker 3");

    let e1 = insert_event(&pool.conn, &event_on("2025-06-10", false), &[1, 2]).expect("event 1");
    let e2 = insert_event(&pool.conn, &event_on("2025-06-10", false), &[3]).expect("event 2");
    assert_eq!((e1, e2), (1, 2));

    insert_code(&pool.conn, "ALPHA1", true, Some(1)).expect("code");
    insert_code(&pool.conn, "BRAVO2", true, Some(3)).expect("code");
    insert_code(&pool.conn, "SHARED1", true, None).expect("code");
    insert_code(&pool.conn, "OLDCODE", false, Some(1)).expect("code");
    pool
}

pub fn count_entries(pool: &DbPool, worker_id: i64) -> i64 {
    pool.conn
        .query_row(
            "SELECT COUNT(*) FROM time_entries WHERE worker_id = ?1",
            [worker_id],
            |row| row.get(0),
        )
        .expect("count entries")
}

/// Initialize a CLI test database with workers, one event and codes.
pub fn init_cli_db(db_path: &str) {
    rtc()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    for (id, role, division) in [("1", "worker", "KITCHEN"), ("2", "manager", "OFFICE")] {
        rtc()
            .args([
                "--db", db_path, "worker", "add", "--id", id, "--name", "test", "--division",
                division, "--role", role,
            ])
            .assert()
            .success();
    }

    rtc()
        .args([
            "--db",
            db_path,
            "event",
            "add",
            "--date",
            "2025-06-10",
            "--start",
            "08:00",
            "--end",
            "17:00",
            "--team",
            "1,2",
        ])
        .assert()
        .success();

    rtc()
        .args(["--db", db_path, "code", "add", "--code", "alpha1", "--worker", "1"])
        .assert()
        .success();
    rtc()
        .args(["--db", db_path, "code", "add", "--code", "SHARED1"])
        .assert()
        .success();
}
