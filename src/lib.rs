//! rTimeclock library root.
//! Exposes the CLI parser, the high-level run() function and the
//! reconciliation modules (normalizer, reconstruction, edit, sync).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Worker { .. } | Commands::Event { .. } | Commands::Code { .. } => {
            cli::commands::directory::handle(&cli.command, cfg)
        }
        Commands::Clock { .. } => cli::commands::clock::handle(&cli.command, cfg),
        Commands::Totals { .. } => cli::commands::totals::handle(&cli.command, cfg),
        Commands::Status { .. } => cli::commands::totals::handle_status(&cli.command, cfg),
        Commands::Edit { .. } => cli::commands::edit::handle(&cli.command, cfg),
        Commands::Sync { .. } => cli::commands::sync::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    // command line overrides win over the config file
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(tz) = &cli.tz {
        cfg.timezone = tz.clone();
    }
    cfg.tz()?;

    dispatch(&cli, &cfg)
}
