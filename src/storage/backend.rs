//! Storage backend abstraction.
//!
//! This module defines the [`Store`] trait over the persistent collection of
//! entries. Backends implement plain CRUD; the ranked substring queries have
//! default implementations on top of [`Store::list`], which backends may
//! override with a native query.
//!
//! The store never recalculates scores. After a successful use the caller
//! computes the new score with [`crate::storage::calculate_score`] and writes
//! it back through [`Store::update`].

use crate::domain::error::{BatchError, Result};
use crate::domain::Entry;
use crate::storage::matching::{self, StoreOptions};

/// Abstraction over persistent entry storage.
///
/// # Implementations
///
/// - [`crate::storage::SqliteStore`]: SQLite `items` table (default)
/// - [`crate::storage::JsonStore`]: JSON file with atomic writes
///
/// # Examples
///
/// ```
/// use rummage::storage::{SqliteStore, Store};
///
/// let mut store = SqliteStore::open_in_memory()?;
/// store.add("github.com/gorilla/mux")?;
/// assert_eq!(store.highest_score_match("mux")?.path, "github.com/gorilla/mux");
/// # Ok::<(), rummage::RummageError>(())
/// ```
pub trait Store: Send {
    /// Query options this store was opened with.
    fn options(&self) -> StoreOptions;

    /// Adds a path with the initial score and returns the stored entry.
    ///
    /// An already stored path is returned unchanged and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RummageError::Validation`] if the path does not look
    /// like a package path, or a storage error if the write fails.
    fn add(&mut self, path: &str) -> Result<Entry>;

    /// Adds several paths in order, stopping at the first failure.
    ///
    /// Paths already stored are skipped and not reported. The returned
    /// entries are the ones actually inserted.
    ///
    /// # Errors
    ///
    /// Returns a [`BatchError`] carrying the entries inserted before the
    /// failing path. Remaining paths are not attempted.
    fn add_multi(&mut self, paths: &[String]) -> std::result::Result<Vec<Entry>, BatchError> {
        let mut added = Vec::new();

        for (index, path) in paths.iter().enumerate() {
            let outcome = match self.contains(path) {
                Ok(true) => continue,
                Ok(false) => self.add(path),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(entry) => added.push(entry),
                Err(source) => {
                    return Err(BatchError {
                        added,
                        index,
                        source,
                    })
                }
            }
        }

        Ok(added)
    }

    /// Retrieves an entry by its exact path.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RummageError::NotFound`] if the path is not stored.
    fn get(&self, path: &str) -> Result<Entry>;

    /// Returns whether a path is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn contains(&self, path: &str) -> Result<bool>;

    /// Overwrites the score and access time of a stored path.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RummageError::NotFound`] if the path is not stored.
    fn update(&mut self, path: &str, score: f64, last_accessed: i64) -> Result<Entry>;

    /// Removes a path and returns the removed entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RummageError::NotFound`] if the path is not stored;
    /// the store is left unchanged.
    fn delete(&mut self, path: &str) -> Result<Entry>;

    /// Removes every entry. No confirmation is asked.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn delete_all(&mut self) -> Result<()>;

    /// Returns all entries in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn list(&self) -> Result<Vec<Entry>>;

    /// Returns the highest scored entry whose path contains `substr`.
    ///
    /// Matching is literal and case-sensitive. Ties keep the earliest
    /// inserted entry. With [`StoreOptions::singleton_shortcut`] set, a store
    /// holding a single entry returns it whatever `substr` is.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RummageError::NoMatch`] if nothing matches.
    fn highest_score_match(&self, substr: &str) -> Result<Entry> {
        matching::highest_score(&self.list()?, substr, self.options())
    }

    /// Returns up to `n` entries containing `substr`, highest score first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RummageError::NoMatch`] if nothing matches.
    fn top_n_matches(&self, substr: &str, n: usize) -> Result<Vec<Entry>> {
        matching::top_n(&self.list()?, substr, n)
    }

    /// Returns the earliest inserted entry containing `substr`, ignoring score.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RummageError::NoMatch`] if nothing matches.
    fn exact_contains_match(&self, substr: &str) -> Result<Entry> {
        matching::first_containing(&self.list()?, substr)
    }
}
