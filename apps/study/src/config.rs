//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use flashcard_core::CategoryOrder;

use crate::source::Source;

const APP_DIR: &str = "flashcards-study";

#[derive(Debug, Parser)]
#[command(
    name = "flashcards-study",
    version,
    about = "Study flashcards and browse markdown notes in the terminal"
)]
pub struct Args {
    /// Card deck: a JSON file path or an http(s) URL.
    #[arg(long, env = "FLASHCARDS_CARDS", default_value = "flashcards.json")]
    pub cards: String,

    /// Notes document: a markdown file path or an http(s) URL.
    #[arg(long, env = "FLASHCARDS_NOTES", default_value = "notes.md")]
    pub notes: String,

    /// Directory for the preference database and the log file.
    #[arg(long, env = "FLASHCARDS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, env = "FLASHCARDS_LOG", default_value = "info")]
    pub log_level: String,

    /// Categories listed first in the selector, in order.
    #[arg(long, env = "FLASHCARDS_CATEGORY_ORDER", value_delimiter = ',')]
    pub category_order: Vec<String>,
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub cards: Source,
    pub notes: Source,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub category_order: CategoryOrder,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        let category_order = if args.category_order.is_empty() {
            CategoryOrder::default()
        } else {
            CategoryOrder::new(args.category_order)
        };

        Self {
            cards: Source::parse(&args.cards),
            notes: Source::parse(&args.notes),
            data_dir: args.data_dir.unwrap_or_else(default_data_dir),
            log_level: args.log_level,
            category_order,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("preferences.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("flashcards-study.log")
    }
}

fn default_data_dir() -> PathBuf {
    // Use app data directory, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
