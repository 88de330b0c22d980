//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing / input validation
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid clock action: {0}")]
    InvalidAction(String),

    #[error("Invalid check-in code: {0}")]
    InvalidCode(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("{0}")]
    Validation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Authorization
    // ---------------------------
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    // ---------------------------
    // Not found
    // ---------------------------
    #[error("Event {0} not found")]
    EventNotFound(i64),

    #[error("Worker {0} not found")]
    WorkerNotFound(i64),

    #[error("Worker {worker} is not on the team of event {event}")]
    WorkerNotOnTeam { worker: i64, event: i64 },

    #[error("Check-in code not found: {0}")]
    CodeNotFound(String),

    // ---------------------------
    // Concurrency
    // ---------------------------
    #[error("Shift was modified concurrently (expected version {expected}, found {found})")]
    VersionConflict { expected: i64, found: i64 },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
