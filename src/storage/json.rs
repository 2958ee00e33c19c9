//! JSON file-based storage backend.
//!
//! A human-readable alternative to the SQLite store. The whole collection is
//! kept in memory and rewritten on every change with an atomic write
//! (write-to-temp + rename) so a crash never leaves a half-written file.
//!
//! # Performance Characteristics
//!
//! - **Read**: loads the entire file once on open
//! - **Write**: O(n), serializes the full collection
//! - **Lookup**: O(n) scan, entries are kept in insertion order
//! - **Best for**: a few thousand entries

use crate::domain::error::{BatchError, Result, RummageError};
use crate::domain::{is_package_path, Entry};
use crate::storage::backend::Store;
use crate::storage::matching::StoreOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// JSON storage container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format.
    version: u32,

    /// Stored entries in insertion order.
    #[serde(default)]
    items: Vec<Entry>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            items: Vec::new(),
        }
    }
}

/// JSON file storage backend.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "items": [
///     {
///       "path": "github.com/gorilla/mux",
///       "score": 5.0,
///       "last_accessed": 1700000000
///     }
///   ]
/// }
/// ```
pub struct JsonStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy of the file.
    data: StorageData,

    options: StoreOptions,
}

impl JsonStore {
    /// Creates or opens a JSON store.
    ///
    /// If the file exists its entries are loaded, otherwise the store starts
    /// empty and the file is written on the first change. Parent directories
    /// are created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StorageData::default()
        };

        tracing::debug!(entry_count = data.items.len(), "JSON store opened");

        Ok(Self {
            file_path,
            data,
            options: StoreOptions::default(),
        })
    }

    /// Replaces the query options.
    #[must_use]
    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Location of the backing file.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)?;

        if data.version != FORMAT_VERSION {
            return Err(RummageError::Storage(format!(
                "unsupported store format version {} in {}",
                data.version,
                path.display()
            )));
        }

        tracing::debug!(
            version = data.version,
            entries = data.items.len(),
            "loaded store data"
        );
        Ok(data)
    }

    /// Saves the collection to disk using an atomic write.
    fn save_to_file(&self) -> Result<()> {
        tracing::trace!(path = ?self.file_path, "saving store data");

        let json = serde_json::to_string_pretty(&self.data)?;
        let tmp_path = self.file_path.with_extension("tmp");

        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::trace!("store saved");
        Ok(())
    }

    fn position(&self, path: &str) -> Option<usize> {
        self.data.items.iter().position(|e| e.path == path)
    }

    /// Inserts into memory only. Returns `None` when the path is already stored.
    fn insert(&mut self, path: &str, now: i64) -> Result<Option<Entry>> {
        if self.position(path).is_some() {
            return Ok(None);
        }
        if !is_package_path(path) {
            return Err(RummageError::Validation(path.to_string()));
        }

        let entry = Entry::new(path, now);
        self.data.items.push(entry.clone());
        Ok(Some(entry))
    }
}

impl Store for JsonStore {
    fn options(&self) -> StoreOptions {
        self.options
    }

    fn add(&mut self, path: &str) -> Result<Entry> {
        let _span = tracing::debug_span!("json_add", path = %path).entered();

        if let Some(index) = self.position(path) {
            tracing::debug!("entry already stored");
            return Ok(self.data.items[index].clone());
        }

        let now = chrono::Utc::now().timestamp();
        let Some(entry) = self.insert(path, now)? else {
            return self.get(path);
        };

        if let Err(e) = self.save_to_file() {
            self.data.items.pop();
            return Err(e);
        }

        tracing::debug!("entry added");
        Ok(entry)
    }

    /// Inserts in memory and saves once, at the end or at the first failure.
    ///
    /// If that final save fails nothing from the batch is kept and the error
    /// reports zero added entries. A path that stopped the batch is still the
    /// reported failure; otherwise the save error is, at `paths.len()`.
    fn add_multi(&mut self, paths: &[String]) -> std::result::Result<Vec<Entry>, BatchError> {
        let _span = tracing::debug_span!("json_add_multi", count = paths.len()).entered();

        let before = self.data.items.len();
        let now = chrono::Utc::now().timestamp();
        let mut added = Vec::new();
        let mut failure = None;

        for (index, path) in paths.iter().enumerate() {
            match self.insert(path, now) {
                Ok(Some(entry)) => added.push(entry),
                Ok(None) => {}
                Err(source) => {
                    tracing::debug!(index, path = %path, error = %source, "batch stopped");
                    failure = Some((index, source));
                    break;
                }
            }
        }

        if !added.is_empty() {
            if let Err(save_error) = self.save_to_file() {
                self.data.items.truncate(before);
                let (index, source) = match failure {
                    Some((index, source)) => {
                        tracing::warn!(error = %save_error, "batch rolled back");
                        (index, source)
                    }
                    None => (paths.len(), save_error),
                };
                return Err(BatchError {
                    added: Vec::new(),
                    index,
                    source,
                });
            }
        }

        tracing::debug!(added_count = added.len(), "batch added");
        match failure {
            Some((index, source)) => Err(BatchError {
                added,
                index,
                source,
            }),
            None => Ok(added),
        }
    }

    fn get(&self, path: &str) -> Result<Entry> {
        self.position(path)
            .map(|index| self.data.items[index].clone())
            .ok_or_else(|| RummageError::NotFound(path.to_string()))
    }

    fn contains(&self, path: &str) -> Result<bool> {
        Ok(self.position(path).is_some())
    }

    fn update(&mut self, path: &str, score: f64, last_accessed: i64) -> Result<Entry> {
        let _span =
            tracing::debug_span!("json_update", path = %path, score, last_accessed).entered();

        let index = self
            .position(path)
            .ok_or_else(|| RummageError::NotFound(path.to_string()))?;

        let previous = self.data.items[index].clone();
        let entry = &mut self.data.items[index];
        entry.score = score;
        entry.last_accessed = last_accessed;
        let updated = entry.clone();

        if let Err(e) = self.save_to_file() {
            self.data.items[index] = previous;
            return Err(e);
        }

        tracing::debug!("entry updated");
        Ok(updated)
    }

    fn delete(&mut self, path: &str) -> Result<Entry> {
        let _span = tracing::debug_span!("json_delete", path = %path).entered();

        let index = self
            .position(path)
            .ok_or_else(|| RummageError::NotFound(path.to_string()))?;

        let removed = self.data.items.remove(index);
        if let Err(e) = self.save_to_file() {
            self.data.items.insert(index, removed);
            return Err(e);
        }

        tracing::debug!("entry deleted");
        Ok(removed)
    }

    fn delete_all(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("json_delete_all").entered();

        let previous = std::mem::take(&mut self.data.items);
        if let Err(e) = self.save_to_file() {
            self.data.items = previous;
            return Err(e);
        }

        tracing::debug!(removed = previous.len(), "all entries deleted");
        Ok(())
    }

    fn list(&self) -> Result<Vec<Entry>> {
        Ok(self.data.items.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("nested").join("rummage.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn open_does_not_create_file_until_first_write() {
        let (_dir, mut store) = store();
        assert!(!store.file_path().exists());
        store.add("github.com/gorilla/mux").unwrap();
        assert!(store.file_path().exists());
    }

    #[test]
    fn entries_survive_reopen_in_order() {
        let (_dir, mut store) = store();
        store.add("a.com/x/one").unwrap();
        store.add("a.com/x/two").unwrap();
        store.update("a.com/x/one", 7.5, 123).unwrap();

        let reopened = JsonStore::open(store.file_path()).unwrap();
        let entries = reopened.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "a.com/x/one");
        assert_eq!(entries[0].score, 7.5);
        assert_eq!(entries[0].last_accessed, 123);
        assert_eq!(entries[1].path, "a.com/x/two");
    }

    #[test]
    fn batch_failure_persists_prefix() {
        let (_dir, mut store) = store();
        let paths: Vec<String> = ["a.com/x/y", "a.com/x/z", "bad", "a.com/x/w"]
            .iter()
            .map(ToString::to_string)
            .collect();

        let err = store.add_multi(&paths).unwrap_err();
        assert_eq!(err.count_added(), 2);
        assert_eq!(err.index, 2);

        let reopened = JsonStore::open(store.file_path()).unwrap();
        let stored: Vec<_> = reopened.list().unwrap().into_iter().map(|e| e.path).collect();
        assert_eq!(stored, ["a.com/x/y", "a.com/x/z"]);
    }

    /// Puts a directory where the store file goes, so every save fails.
    fn block_saves(store: &JsonStore) {
        let path = store.file_path();
        if path.exists() {
            std::fs::remove_file(path).unwrap();
        }
        std::fs::create_dir(path).unwrap();
    }

    fn stored(store: &JsonStore) -> Vec<Entry> {
        store.list().unwrap()
    }

    #[test]
    fn failed_save_propagates_and_rolls_back() {
        let (_dir, mut store) = store();
        store.add("a.com/x/y").unwrap();
        store.add("a.com/x/z").unwrap();
        store.update("a.com/x/y", 3.0, 9).unwrap();
        let before = stored(&store);
        block_saves(&store);

        assert!(store.add("a.com/x/new").unwrap_err().is_storage_failure());
        assert_eq!(stored(&store), before);

        assert!(store.update("a.com/x/y", 8.0, 10).unwrap_err().is_storage_failure());
        assert_eq!(stored(&store), before);

        assert!(store.delete("a.com/x/z").unwrap_err().is_storage_failure());
        assert_eq!(stored(&store), before);

        assert!(store.delete_all().unwrap_err().is_storage_failure());
        assert_eq!(stored(&store), before);

        // Lookups that need no write keep working.
        assert_eq!(store.add("a.com/x/y").unwrap().score, 3.0);
        assert!(matches!(store.delete("a.com/x/nope"), Err(RummageError::NotFound(_))));
    }

    #[test]
    fn failed_batch_save_reports_the_save_error() {
        let (_dir, mut store) = store();
        block_saves(&store);
        let paths: Vec<String> = ["a.com/x/y", "a.com/x/w"]
            .iter()
            .map(ToString::to_string)
            .collect();

        let err = store.add_multi(&paths).unwrap_err();
        assert_eq!(err.count_added(), 0);
        assert_eq!(err.index, paths.len());
        assert!(err.source.is_storage_failure());
        assert!(stored(&store).is_empty());
    }

    #[test]
    fn failed_batch_save_keeps_the_invalid_path() {
        let (_dir, mut store) = store();
        block_saves(&store);
        let paths: Vec<String> = ["a.com/x/y", "bad", "a.com/x/w"]
            .iter()
            .map(ToString::to_string)
            .collect();

        let err = store.add_multi(&paths).unwrap_err();
        assert_eq!(err.count_added(), 0);
        assert_eq!(err.index, 1);
        assert!(matches!(err.source, RummageError::Validation(ref p) if p == "bad"));
        assert!(stored(&store).is_empty());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rummage.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonStore::open(&path).err().unwrap();
        assert!(err.is_storage_failure());
    }

    #[test]
    fn unknown_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rummage.json");
        std::fs::write(&path, r#"{"version": 9, "items": []}"#).unwrap();

        assert!(matches!(JsonStore::open(&path), Err(RummageError::Storage(_))));
    }
}
