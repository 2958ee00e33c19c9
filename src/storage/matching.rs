//! Substring ranking over an ordered snapshot of entries.
//!
//! These functions back the default query methods of
//! [`crate::storage::Store`]. The input slice must be in stable store order
//! (insertion order) so tie-breaking is deterministic.

use crate::domain::error::{Result, RummageError};
use crate::domain::Entry;

/// Options that change how queries behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// When the store holds exactly one entry, `highest_score_match` returns
    /// it without checking that it contains the query.
    pub singleton_shortcut: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            singleton_shortcut: true,
        }
    }
}

/// Returns the containing entry with the greatest score.
///
/// Ties keep the first entry encountered. See [`StoreOptions`] for the
/// singleton shortcut.
///
/// # Errors
///
/// Returns [`RummageError::NoMatch`] when nothing matches.
pub fn highest_score(entries: &[Entry], substr: &str, options: StoreOptions) -> Result<Entry> {
    if options.singleton_shortcut {
        if let [only] = entries {
            return Ok(only.clone());
        }
    }

    let mut best: Option<&Entry> = None;
    for entry in entries.iter().filter(|e| e.path.contains(substr)) {
        if best.map_or(true, |b| entry.score > b.score) {
            best = Some(entry);
        }
    }

    best.cloned()
        .ok_or_else(|| RummageError::NoMatch(substr.to_string()))
}

/// Returns up to `n` containing entries, highest score first.
///
/// # Errors
///
/// Returns [`RummageError::NoMatch`] when nothing matches.
pub fn top_n(entries: &[Entry], substr: &str, n: usize) -> Result<Vec<Entry>> {
    let mut matches: Vec<Entry> = entries
        .iter()
        .filter(|e| e.path.contains(substr))
        .cloned()
        .collect();

    if matches.is_empty() {
        return Err(RummageError::NoMatch(substr.to_string()));
    }

    super::sort_by_frecency(&mut matches);
    matches.truncate(n);
    Ok(matches)
}

/// Returns the first containing entry in store order, ignoring score.
///
/// # Errors
///
/// Returns [`RummageError::NoMatch`] when nothing matches.
pub fn first_containing(entries: &[Entry], substr: &str) -> Result<Entry> {
    entries
        .iter()
        .find(|e| e.path.contains(substr))
        .cloned()
        .ok_or_else(|| RummageError::NoMatch(substr.to_string()))
}
