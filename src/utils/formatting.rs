//! Formatting utilities used for CLI outputs.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Milliseconds as `HHh MMm`.
pub fn ms2readable(ms: i64) -> String {
    let mins = ms.max(0) / 60_000;
    format!("{:02}h {:02}m", mins / 60, mins % 60)
}

/// Local wall-clock rendering of an optional instant, `--:--` when absent.
pub fn local_hm(ts: Option<DateTime<Utc>>, tz: Tz) -> String {
    match ts {
        Some(t) => t.with_timezone(&tz).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}
