//! Error types for rummage.
//!
//! This module defines the centralized error type [`RummageError`], the
//! [`BatchError`] returned by bulk inserts, and a [`Result`] alias. All errors
//! are implemented with the `thiserror` crate.

use crate::domain::Entry;
use thiserror::Error;

/// The main error type for store and worker operations.
///
/// Validation, not-found and no-match conditions are separate variants so
/// callers can branch on them. Everything the persistence layer can throw is
/// grouped under [`RummageError::is_storage_failure`].
///
/// # Examples
///
/// ```
/// use rummage::RummageError;
///
/// let err = RummageError::NoMatch("mux".to_string());
/// assert_eq!(err.to_string(), "no match found with the given argument mux");
/// assert!(!err.is_storage_failure());
/// ```
#[derive(Debug, Error)]
pub enum RummageError {
    /// The path does not have the shape of a package path.
    #[error("{0} does not resemble a valid package path")]
    Validation(String),

    /// The operation targets a path absent from the store.
    #[error("the entry {0} does not exist")]
    NotFound(String),

    /// A substring query matched nothing.
    #[error("no match found with the given argument {0}")]
    NoMatch(String),

    /// Storage backend failed in a way described as text.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite reported an error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON encoding or decoding of the store file failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RummageError {
    /// Returns `true` for failures of the underlying persistence layer.
    #[must_use]
    pub const fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Io(_) | Self::Database(_) | Self::Serialization(_)
        )
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::NoMatch(_) => "no_match",
            Self::Config(_) => "config",
            Self::Storage(_) | Self::Io(_) | Self::Database(_) | Self::Serialization(_) => {
                "storage"
            }
        }
    }
}

/// A bulk insert that stopped on its first failing path.
///
/// Carries everything inserted before the failure. Those entries are already
/// persisted; the paths after `index` were never attempted.
#[derive(Debug, Error)]
#[error("stopped after adding {} entries: {source}", .added.len())]
pub struct BatchError {
    /// Entries inserted before the failure, in input order.
    pub added: Vec<Entry>,

    /// Position of the failing path in the input, or the input length when
    /// every path was accepted and persisting the batch failed.
    pub index: usize,

    /// Why the path at `index` could not be added, or why the batch could not
    /// be persisted.
    #[source]
    pub source: RummageError,
}

impl BatchError {
    /// Number of entries inserted before the failure.
    #[must_use]
    pub fn count_added(&self) -> usize {
        self.added.len()
    }
}

/// A specialized `Result` type for rummage operations.
pub type Result<T> = std::result::Result<T, RummageError>;
