use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists; it also records applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

const CORE_TABLES: &str = r#"
    CREATE TABLE IF NOT EXISTS workers (
        id          INTEGER PRIMARY KEY,
        name        TEXT NOT NULL,
        division    TEXT,
        role        TEXT NOT NULL DEFAULT 'worker' CHECK(role IN ('worker','manager','admin')),
        created_at  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS events (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        name              TEXT NOT NULL DEFAULT '',
        date              TEXT NOT NULL,
        start_time        TEXT NOT NULL,
        end_time          TEXT NOT NULL,
        crosses_midnight  INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS event_team (
        event_id   INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
        worker_id  INTEGER NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
        PRIMARY KEY (event_id, worker_id)
    );

    CREATE TABLE IF NOT EXISTS time_entries (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        worker_id   INTEGER NOT NULL,
        action      TEXT NOT NULL CHECK(action IN ('clock_in','clock_out','meal_start','meal_end')),
        ts          TEXT NOT NULL,
        started_at  TEXT,
        event_id    INTEGER,
        division    TEXT NOT NULL,
        note        TEXT,
        created_at  TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_entries_worker_ts ON time_entries(worker_id, ts);
    CREATE INDEX IF NOT EXISTS idx_entries_event_worker ON time_entries(event_id, worker_id);
    CREATE INDEX IF NOT EXISTS idx_entries_worker_started ON time_entries(worker_id, started_at);

    CREATE TABLE IF NOT EXISTS day_versions (
        worker_id  INTEGER NOT NULL,
        day        TEXT NOT NULL,
        version    INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (worker_id, day)
    );
"#;

const CHECKIN_TABLES: &str = r#"
    CREATE TABLE IF NOT EXISTS checkin_codes (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        code              TEXT NOT NULL UNIQUE,
        is_active         INTEGER NOT NULL DEFAULT 1,
        target_worker_id  INTEGER REFERENCES workers(id)
    );

    CREATE TABLE IF NOT EXISTS checkin_log (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        code_id        INTEGER NOT NULL REFERENCES checkin_codes(id),
        worker_id      INTEGER NOT NULL,
        day            TEXT NOT NULL,
        checked_in_at  TEXT NOT NULL,
        source         TEXT NOT NULL DEFAULT 'device'
    );

    CREATE INDEX IF NOT EXISTS idx_checkin_log_code_day ON checkin_log(code_id, worker_id, day);

    CREATE TABLE IF NOT EXISTS attestations (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        entry_id        INTEGER,
        worker_id       INTEGER NOT NULL,
        form_data_hash  TEXT NOT NULL,
        signature_hash  TEXT NOT NULL,
        binding_hash    TEXT NOT NULL UNIQUE,
        signed_at       TEXT NOT NULL,
        created_at      TEXT NOT NULL
    );
"#;

/// Ordered list of schema migrations: (version tag, SQL).
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250301_0001_core_tables",
        CORE_TABLES,
        "Created workers, events, event_team, time_entries and day_versions",
    ),
    (
        "20250301_0002_checkin_tables",
        CHECKIN_TABLES,
        "Created checkin_codes, checkin_log and attestations",
    ),
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations.
///
/// Each migration runs in its own transaction together with the `log` row
/// that marks it applied. Returns the number of migrations applied.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, sql, message) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [version, message],
        )?;
        tx.commit()?;

        tracing::info!(version, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
