//! SQLite-backed key-value store.
//!
//! A single `kv` table holds every persisted stopwatch value, so state
//! written by one invocation survives into the next.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{AppError, KvStore, Result};

/// Key-value store persisted in a local SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the store database.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened or schema creation
    /// fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create storage directory", e))?;
        }

        let conn = Connection::open(path).map_err(AppError::storage)?;

        // WAL lets a watch loop and a second invocation share the file
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(AppError::storage)?;

        let store = Self { conn };
        store.init_schema()?;

        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
            )
            .map_err(AppError::storage)?;

        Ok(())
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(AppError::storage)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            ",
                params![key, value],
            )
            .map_err(AppError::storage)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .map_err(AppError::storage)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("state.db");

        let store = SqliteStore::open(&db_path).unwrap();

        let count: i64 = store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='kv'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(count, 1);
    }

    #[test]
    fn test_set_get_overwrite_remove() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("state.db")).unwrap();

        assert_eq!(store.get("missing").unwrap(), None);

        store.set("stopwatch_running", "true").unwrap();
        assert_eq!(
            store.get("stopwatch_running").unwrap().as_deref(),
            Some("true")
        );

        store.set("stopwatch_running", "false").unwrap();
        assert_eq!(
            store.get("stopwatch_running").unwrap().as_deref(),
            Some("false")
        );

        store.remove("stopwatch_running").unwrap();
        assert_eq!(store.get("stopwatch_running").unwrap(), None);

        // removing an absent key is fine
        store.remove("stopwatch_running").unwrap();
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("state.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            store.set("stopwatch_start_ms", "1700000000000").unwrap();
        }

        let store = SqliteStore::open(&db_path).unwrap();
        assert_eq!(
            store.get("stopwatch_start_ms").unwrap().as_deref(),
            Some("1700000000000")
        );
    }
}
