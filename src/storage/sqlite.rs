//! SQLite storage backend.
//!
//! Entries live in a single `items` table:
//!
//! ```sql
//! CREATE TABLE items (
//!     entry TEXT NOT NULL UNIQUE,
//!     score FLOAT NOT NULL DEFAULT 1.0,
//!     lastAccessed INTEGER NOT NULL
//! )
//! ```
//!
//! Databases created by earlier releases have the same columns without the
//! constraints and open unchanged. Every operation is a single statement;
//! the select-then-insert in [`Store::add`] is not wrapped in a transaction.
//!
//! Substring queries use `instr()` rather than `LIKE`, so matching is literal
//! and case-sensitive, and order ties by `rowid` (insertion order).

use crate::domain::error::{Result, RummageError};
use crate::domain::{is_package_path, Entry, INITIAL_SCORE};
use crate::storage::backend::Store;
use crate::storage::matching::StoreOptions;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// Milliseconds to wait on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5000;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS items (
    entry TEXT NOT NULL UNIQUE,
    score FLOAT NOT NULL DEFAULT 1.0,
    lastAccessed INTEGER NOT NULL
)";

const SELECT_COLUMNS: &str = "SELECT entry, score, lastAccessed FROM items";

fn entry_from_row(row: &Row) -> rusqlite::Result<Entry> {
    Ok(Entry {
        path: row.get("entry")?,
        score: row.get("score")?,
        last_accessed: row.get("lastAccessed")?,
    })
}

/// SQLite storage backend.
pub struct SqliteStore {
    conn: Connection,
    options: StoreOptions,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`.
    ///
    /// Parent directories are created and the `items` table is ensured.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened or initialized.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(|e| {
            RummageError::Storage(format!("failed to open {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "database connection opened");

        Self::init(conn)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        tracing::debug!("in-memory database opened");
        Self::init(conn)
    }

    /// Replaces the query options.
    #[must_use]
    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"))?;
        conn.execute(SCHEMA, []).map_err(|e| {
            RummageError::Storage(format!("could not create 'items' table: {e}"))
        })?;

        Ok(Self {
            conn,
            options: StoreOptions::default(),
        })
    }

    fn find(&self, path: &str) -> Result<Option<Entry>> {
        let entry = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE entry = ?1 LIMIT 1"),
                params![path],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl Store for SqliteStore {
    fn options(&self) -> StoreOptions {
        self.options
    }

    fn add(&mut self, path: &str) -> Result<Entry> {
        let _span = tracing::debug_span!("sqlite_add", path = %path).entered();

        if let Some(existing) = self.find(path)? {
            tracing::debug!("entry already stored");
            return Ok(existing);
        }

        if !is_package_path(path) {
            tracing::debug!("rejected path");
            return Err(RummageError::Validation(path.to_string()));
        }

        let now = chrono::Utc::now().timestamp();
        self.conn.execute(
            "INSERT INTO items (entry, score, lastAccessed) VALUES (?1, ?2, ?3)",
            params![path, INITIAL_SCORE, now],
        )?;

        tracing::debug!("entry added");
        Ok(Entry::new(path, now))
    }

    fn get(&self, path: &str) -> Result<Entry> {
        self.find(path)?
            .ok_or_else(|| RummageError::NotFound(path.to_string()))
    }

    fn contains(&self, path: &str) -> Result<bool> {
        Ok(self.find(path)?.is_some())
    }

    fn update(&mut self, path: &str, score: f64, last_accessed: i64) -> Result<Entry> {
        let _span =
            tracing::debug_span!("sqlite_update", path = %path, score, last_accessed).entered();

        let changed = self.conn.execute(
            "UPDATE items SET score = ?1, lastAccessed = ?2 WHERE entry = ?3",
            params![score, last_accessed, path],
        )?;

        if changed == 0 {
            return Err(RummageError::NotFound(path.to_string()));
        }

        tracing::debug!("entry updated");
        Ok(Entry {
            path: path.to_string(),
            score,
            last_accessed,
        })
    }

    fn delete(&mut self, path: &str) -> Result<Entry> {
        let _span = tracing::debug_span!("sqlite_delete", path = %path).entered();

        let entry = self.get(path)?;
        self.conn
            .execute("DELETE FROM items WHERE entry = ?1", params![path])?;

        tracing::debug!("entry deleted");
        Ok(entry)
    }

    fn delete_all(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("sqlite_delete_all").entered();

        let removed = self.conn.execute("DELETE FROM items", [])?;

        tracing::debug!(removed, "all entries deleted");
        Ok(())
    }

    fn list(&self) -> Result<Vec<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid"))?;
        let entries = stmt
            .query_map([], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn highest_score_match(&self, substr: &str) -> Result<Entry> {
        let _span = tracing::debug_span!("sqlite_highest_score_match", query = %substr).entered();

        if self.options.singleton_shortcut && self.count()? == 1 {
            tracing::debug!("single entry, skipping match");
            let only = self.conn.query_row(
                &format!("{SELECT_COLUMNS} LIMIT 1"),
                [],
                entry_from_row,
            )?;
            return Ok(only);
        }

        self.conn
            .query_row(
                &format!(
                    "{SELECT_COLUMNS} WHERE instr(entry, ?1) > 0 \
                     ORDER BY score DESC, rowid ASC LIMIT 1"
                ),
                params![substr],
                entry_from_row,
            )
            .optional()?
            .ok_or_else(|| RummageError::NoMatch(substr.to_string()))
    }

    fn top_n_matches(&self, substr: &str, n: usize) -> Result<Vec<Entry>> {
        let _span = tracing::debug_span!("sqlite_top_n_matches", query = %substr, n).entered();

        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE instr(entry, ?1) > 0 ORDER BY score DESC, rowid ASC"
        ))?;
        let matches = stmt
            .query_map(params![substr], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if matches.is_empty() {
            return Err(RummageError::NoMatch(substr.to_string()));
        }

        tracing::debug!(match_count = matches.len(), "query matched");
        Ok(matches.into_iter().take(n).collect())
    }

    fn exact_contains_match(&self, substr: &str) -> Result<Entry> {
        self.conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE instr(entry, ?1) > 0 ORDER BY rowid LIMIT 1"),
                params![substr],
                entry_from_row,
            )
            .optional()?
            .ok_or_else(|| RummageError::NoMatch(substr.to_string()))
    }
}
