mod cli;
mod config;
mod db;
mod models;
mod series;
mod store;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use store::{MemoryStorage, ProgressStore, SqliteStorage, Storage};
use utils::clock::Clock;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    if let Some(Commands::Courses { init }) = cli.command {
        return handlers::handle_courses(&config, init);
    }

    let clock = cli.today.map(Clock::fixed).unwrap_or_default();
    let mut store = ProgressStore::load(&config.courses, open_storage(), clock);
    let today = store.today();
    store.roll_forward(today);

    match cli.command {
        Some(Commands::Log { course, slides }) => {
            handlers::handle_log(&mut store, &course, &slides)?;
        }
        Some(Commands::Status) => {
            handlers::handle_status(&store)?;
        }
        Some(Commands::Chart) => {
            handlers::handle_chart(&store)?;
        }
        Some(Commands::Export { output }) => {
            handlers::handle_export(&store, output.as_deref())?;
        }
        Some(Commands::Import { file }) => {
            handlers::handle_import(&mut store, &file)?;
        }
        Some(Commands::Theme { mode }) => {
            handlers::handle_theme(&mut store, mode)?;
        }
        Some(Commands::Courses { .. }) => unreachable!(),

        // No subcommand → launch TUI
        None => {
            tui::app::run(store, &config)?;
        }
    }

    Ok(())
}

/// Open the on-disk database, or fall back to memory so the session still works.
fn open_storage() -> Box<dyn Storage> {
    let opened = AppConfig::ensure_data_dir()
        .and_then(|_| AppConfig::db_path())
        .and_then(|path| SqliteStorage::open(&path));
    match opened {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            warn!("Storage unavailable, progress will not be saved: {:#}", e);
            Box::new(MemoryStorage::new())
        }
    }
}
