//! Recall worker: drives a store on behalf of a front end.
//!
//! The worker owns one [`Store`] and answers [`Request`]s. It is the only
//! place that applies the frecency score model: whenever an entry is used
//! (touched, resolved) the new score is computed with
//! [`calculate_score`] and written back through [`Store::update`].

use crate::config::Config;
use crate::domain::error::{BatchError, Result, RummageError};
use crate::domain::Entry;
use crate::infrastructure::scan_module_cache;
use crate::storage::{calculate_score, sort_by_frecency, Store};
use crate::worker::{Request, Response};

/// Minimum number of `/` for input to be taken as a full package path.
const FULL_PATH_SLASHES: usize = 2;

/// Worker state: the store plus the settings that shape responses.
pub struct RecallWorker {
    store: Box<dyn Store>,
    query_limit: usize,
}

impl RecallWorker {
    /// Creates a worker around an already opened store.
    #[must_use]
    pub fn new(store: Box<dyn Store>, config: &Config) -> Self {
        Self {
            store,
            query_limit: config.query_limit,
        }
    }

    /// Read access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Handles a single request. Failures are reported as [`Response::Error`]
    /// or [`Response::BatchFailed`], never by panicking.
    pub fn handle(&mut self, request: Request) -> Response {
        let _span = tracing::debug_span!("handle_request", request = ?request).entered();

        match request {
            Request::Add { paths } => Self::batch_response(self.store.add_multi(&paths)),
            Request::Touch { path } => Self::entry_response("touch", self.touch(&path)),
            Request::Resolve { query } => Self::entry_response("resolve", self.resolve(&query)),
            Request::Exact { query } => {
                let result = self
                    .store
                    .exact_contains_match(&query)
                    .and_then(|entry| self.record_use(&entry));
                Self::entry_response("exact", result)
            }
            Request::Query { query, limit } => {
                let limit = limit.unwrap_or(self.query_limit);
                match self.store.top_n_matches(&query, limit) {
                    Ok(entries) => Response::Entries { entries },
                    Err(e) => Self::failure("query", e),
                }
            }
            Request::Remove { paths } => self.remove(&paths),
            Request::RemoveAll => match self.store.delete_all() {
                Ok(()) => Response::Cleared,
                Err(e) => Self::failure("remove all", e),
            },
            Request::List => match self.store.list() {
                Ok(mut entries) => {
                    sort_by_frecency(&mut entries);
                    Response::Entries { entries }
                }
                Err(e) => Self::failure("list", e),
            },
            Request::Populate { dir } => match scan_module_cache(&dir) {
                Ok(paths) => {
                    tracing::debug!(found = paths.len(), "populating from module cache");
                    Self::batch_response(self.store.add_multi(&paths))
                }
                Err(e) => Self::failure("populate", e),
            },
        }
    }

    /// Records a use of an exact stored path.
    ///
    /// # Errors
    ///
    /// Returns [`RummageError::NotFound`] if the path is not stored.
    pub fn touch(&mut self, path: &str) -> Result<Entry> {
        let entry = self.store.get(path)?;
        self.record_use(&entry)
    }

    /// Resolves user input to an entry and records the use.
    ///
    /// Input containing at least two `/` is treated as a full package path:
    /// it is added when new and then touched. Anything else goes through
    /// [`Store::highest_score_match`].
    ///
    /// # Errors
    ///
    /// Returns [`RummageError::Validation`] for a malformed full path and
    /// [`RummageError::NoMatch`] when a fragment matches nothing.
    pub fn resolve(&mut self, query: &str) -> Result<Entry> {
        let entry = if query.matches('/').count() >= FULL_PATH_SLASHES {
            self.store.add(query)?
        } else {
            self.store.highest_score_match(query)?
        };
        self.record_use(&entry)
    }

    fn record_use(&mut self, entry: &Entry) -> Result<Entry> {
        let now = chrono::Utc::now().timestamp();
        let score = calculate_score(entry, now);
        tracing::debug!(
            path = %entry.path,
            old_score = entry.score,
            new_score = score,
            "recording use"
        );
        self.store.update(&entry.path, score, now)
    }

    fn remove(&mut self, paths: &[String]) -> Response {
        let mut removed = Vec::new();
        let mut missing = Vec::new();

        for path in paths {
            match self.store.delete(path) {
                Ok(entry) => removed.push(entry),
                Err(RummageError::NotFound(path)) => missing.push(path),
                Err(e) => {
                    tracing::debug!(
                        path = %path,
                        removed = removed.len(),
                        error = %e,
                        "remove stopped"
                    );
                    return Response::RemoveFailed {
                        removed,
                        missing,
                        failed_path: path.clone(),
                        message: e.to_string(),
                    };
                }
            }
        }

        tracing::debug!(removed = removed.len(), missing = missing.len(), "remove finished");
        Response::Removed { removed, missing }
    }

    fn entry_response(operation: &str, result: Result<Entry>) -> Response {
        match result {
            Ok(entry) => Response::Entry { entry },
            Err(e) => Self::failure(operation, e),
        }
    }

    fn batch_response(result: std::result::Result<Vec<Entry>, BatchError>) -> Response {
        match result {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "batch stored");
                Response::Added {
                    count: entries.len(),
                    entries,
                }
            }
            Err(e) => {
                tracing::debug!(count = e.count_added(), error = %e, "batch failed");
                let failed_path = match &e.source {
                    RummageError::Validation(path) => Some(path.clone()),
                    _ => None,
                };
                Response::BatchFailed {
                    count: e.count_added(),
                    message: e.to_string(),
                    failed_path,
                    entries: e.added,
                }
            }
        }
    }

    fn failure(operation: &str, error: RummageError) -> Response {
        tracing::debug!(operation = operation, error = %error, "request failed");
        Response::from(error)
    }
}
