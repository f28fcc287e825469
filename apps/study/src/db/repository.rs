//! Repository pattern for preference storage.

use crate::db::error::DbError;
use crate::db::schema::{INIT_SCHEMA_VERSION, SCHEMA, SCHEMA_VERSION, THEME_KEY};
use flashcard_core::{Theme, ThemeStore};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// Repository for key/value preferences.
pub trait PreferenceRepository {
    fn get_preference(&self, key: &str) -> Result<Option<String>>;
    fn set_preference(&self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed repository.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing, or when the data directory is unusable).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        self.conn.execute_batch(INIT_SCHEMA_VERSION)?;

        let version: i32 = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            return Err(DbError::InvalidData(format!(
                "database schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }
        Ok(())
    }
}

impl PreferenceRepository for SqliteRepository {
    fn get_preference(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

impl ThemeStore for SqliteRepository {
    type Error = DbError;

    fn load_theme(&self) -> Result<Option<Theme>> {
        let stored = self.get_preference(THEME_KEY)?;
        Ok(stored.as_deref().and_then(Theme::from_str))
    }

    fn save_theme(&mut self, theme: Theme) -> Result<()> {
        self.set_preference(THEME_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_preference_is_none() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.get_preference("theme").unwrap(), None);
        assert_eq!(repo.load_theme().unwrap(), None);
    }

    #[test]
    fn set_preference_overwrites() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.set_preference("theme", "dark").unwrap();
        repo.set_preference("theme", "light").unwrap();
        assert_eq!(repo.get_preference("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn unknown_theme_value_reads_as_none() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.set_preference(THEME_KEY, "sepia").unwrap();
        assert_eq!(repo.load_theme().unwrap(), None);
    }

    #[test]
    fn theme_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.db");

        let mut repo = SqliteRepository::open(&path).unwrap();
        repo.save_theme(Theme::Dark).unwrap();
        drop(repo);

        let repo = SqliteRepository::open(&path).unwrap();
        assert_eq!(repo.load_theme().unwrap(), Some(Theme::Dark));
    }

    #[test]
    fn rejects_newer_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(SCHEMA).unwrap();
            conn.execute("INSERT INTO schema_version (version) VALUES (99)", [])
                .unwrap();
        }
        assert!(matches!(
            SqliteRepository::open(&path),
            Err(DbError::InvalidData(_))
        ));
    }
}
