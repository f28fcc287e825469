//! Local SQLite storage for user preferences.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{PreferenceRepository, SqliteRepository};
