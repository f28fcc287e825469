//! Terminal flashcard study tool with a paginated markdown notes viewer.

pub mod config;
pub mod db;
pub mod source;
mod tui;

use std::fs::{self, File, OpenOptions};
use std::io;
use std::sync::Mutex;

use clap::Parser;
use flashcard_core::StudyController;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Args, Config};
use crate::db::SqliteRepository;

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_args(Args::parse());

    // Nothing is logged to the terminal once the UI starts, so report setup failures now
    if let Err(e) = fs::create_dir_all(&config.data_dir) {
        eprintln!(
            "flashcards-study: cannot create data directory {}: {}",
            config.data_dir.display(),
            e
        );
    }
    if let Err(e) = init_tracing(&config) {
        eprintln!(
            "flashcards-study: logging disabled, cannot open {}: {}",
            config.log_path().display(),
            e
        );
    }
    tracing::info!("Starting flashcards-study {}", env!("CARGO_PKG_VERSION"));

    let repository = open_repository(&config)?;
    let controller = StudyController::new(
        repository,
        config.category_order.clone(),
        config.notes.name(),
    );

    let runtime = tokio::runtime::Runtime::new()?;
    tui::run(&config, controller, runtime.handle().clone())
}

/// Log to a file in the data directory; a terminal UI owns stdout.
fn init_tracing(config: &Config) -> io::Result<()> {
    let file = open_log_file(config)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn open_log_file(config: &Config) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
}

/// Open the preference database, or keep preferences in memory for this session.
fn open_repository(config: &Config) -> anyhow::Result<SqliteRepository> {
    let db_path = config.db_path();
    match SqliteRepository::open(&db_path) {
        Ok(repository) => Ok(repository),
        Err(e) => {
            tracing::warn!(
                "Cannot open preference database at {}: {}; theme will not be saved",
                db_path.display(),
                e
            );
            Ok(SqliteRepository::open_in_memory()?)
        }
    }
}
