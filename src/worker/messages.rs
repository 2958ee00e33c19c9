//! Request and response types for the recall worker.
//!
//! A front end (a CLI, an editor plugin) describes what the user asked for
//! with a [`Request`] and renders the [`Response`]. Both serialize to JSON so
//! the worker can also sit behind a pipe.

use crate::domain::Entry;
use crate::RummageError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Operations the worker can perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Remember new package paths, stopping at the first invalid one.
    Add {
        /// Package paths in the order they should be added.
        paths: Vec<String>,
    },

    /// Record a use of a stored path, bumping its score.
    Touch {
        /// Exact package path.
        path: String,
    },

    /// Resolve user input to the package to fetch and record the use.
    ///
    /// Input with two or more `/` is taken as a full path and added if new.
    /// Anything else is looked up with the highest-score substring match.
    Resolve {
        /// Full path or fragment typed by the user.
        query: String,
    },

    /// Like `Resolve`, but takes the first stored path containing the query.
    Exact {
        /// Substring to look for.
        query: String,
    },

    /// List the best matches for a fragment without recording a use.
    Query {
        /// Substring to look for.
        query: String,

        /// Maximum rows; the configured default when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<usize>,
    },

    /// Forget individual paths.
    Remove {
        /// Exact package paths.
        paths: Vec<String>,
    },

    /// Forget everything. The caller is expected to have confirmed.
    RemoveAll,

    /// Every stored entry, highest score first.
    List,

    /// Add every package found in a Go module cache directory.
    Populate {
        /// Module cache root, usually `$GOPATH/pkg/mod`.
        dir: PathBuf,
    },
}

/// Results sent back for a [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// A single entry, after any score update.
    Entry {
        entry: Entry,
    },

    /// Several entries, in ranking order.
    Entries {
        entries: Vec<Entry>,
    },

    /// New entries were stored. Paths already present are not included.
    Added {
        count: usize,
        entries: Vec<Entry>,
    },

    /// A batch stopped on a failing path after storing `count` entries.
    BatchFailed {
        count: usize,
        entries: Vec<Entry>,
        failed_path: Option<String>,
        message: String,
    },

    /// Outcome of a `Remove` request.
    Removed {
        /// Entries that were deleted, as they were before deletion.
        removed: Vec<Entry>,

        /// Requested paths that were not stored.
        missing: Vec<String>,
    },

    /// A `Remove` stopped on a storage failure. Entries listed in `removed`
    /// were deleted before it; later paths were not attempted.
    RemoveFailed {
        removed: Vec<Entry>,
        missing: Vec<String>,
        failed_path: String,
        message: String,
    },

    /// The store was emptied.
    Cleared,

    /// The request failed.
    Error {
        /// `validation`, `not_found`, `no_match`, `storage` or `config`.
        kind: String,

        /// Human-readable error message.
        message: String,
    },
}

impl From<RummageError> for Response {
    fn from(error: RummageError) -> Self {
        Self::Error {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}
