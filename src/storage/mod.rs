//! Storage layer for remembered package paths.
//!
//! This module provides the [`Store`] abstraction, its two backends and the
//! frecency score model that callers apply on every use.
//!
//! # Modules
//!
//! - `backend`: Store trait
//! - `sqlite`: SQLite `items` table backend
//! - `json`: JSON file backend
//! - `frecency`: Score recalculation and frecency sorting
//! - `matching`: Substring ranking shared by backends

pub mod backend;
pub mod frecency;
pub mod json;
pub mod matching;
pub mod sqlite;

pub use backend::Store;
pub use frecency::{calculate_score, sort_by_frecency};
pub use json::JsonStore;
pub use matching::StoreOptions;
pub use sqlite::SqliteStore;

use crate::config::{Backend, Config};
use crate::domain::error::Result;

/// Opens the store selected by `config`.
///
/// The file lives directly under [`Config::data_dir`]: `rummage.db` for the
/// SQLite backend, `rummage.json` for the JSON backend.
///
/// # Errors
///
/// Returns an error if the backend cannot be opened.
pub fn open_store(config: &Config) -> Result<Box<dyn Store>> {
    let options = StoreOptions {
        singleton_shortcut: config.singleton_shortcut,
    };
    let path = config.store_path();
    tracing::debug!(backend = ?config.backend, path = %path.display(), "opening store");

    let store: Box<dyn Store> = match config.backend {
        Backend::Sqlite => Box::new(SqliteStore::open(&path)?.with_options(options)),
        Backend::Json => Box::new(JsonStore::open(path)?.with_options(options)),
    };
    Ok(store)
}
