use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::sync::{SyncBatch, SyncReconciler};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use std::io::Read;
use std::time::Duration;

/// Replay an offline batch and print the per-item outcome as JSON.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync { file } = cmd {
        let raw = if file == "-" {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(file)?
        };
        let batch: SyncBatch = serde_json::from_str(&raw)?;

        let tz = cfg.tz()?;
        let mut pool = DbPool::open(&cfg.database)?;
        let response = SyncReconciler::new(
            &mut pool,
            tz,
            &cfg.default_division,
            Duration::from_secs(cfg.sync_timeout_secs),
        )
        .run(batch);

        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}
