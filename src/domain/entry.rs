//! Entry domain model and package-path validation.
//!
//! An [`Entry`] is one remembered package path together with its frecency
//! score and the time it was last used. Only paths shaped like a Go package
//! path (`host.tld/org/repo`, optionally ending in `/vN`) are accepted.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use regex::Regex;

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// Score assigned to a newly created entry.
pub const INITIAL_SCORE: f64 = 1.0;

static PACKAGE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9-]+\.)+[A-Za-z0-9-]+(/[A-Za-z0-9_.!-]+)+(/[vV][0-9]+)?$")
        .expect("package path pattern is valid")
});

/// Returns `true` if `path` has the shape of a package path.
///
/// One or more dot-separated host labels, then at least one `/`-separated
/// segment made of letters, digits, `-`, `_`, `.` or `!`, with an optional
/// `/vN` suffix.
///
/// # Examples
///
/// ```
/// use rummage::domain::is_package_path;
///
/// assert!(is_package_path("github.com/gorilla/mux"));
/// assert!(is_package_path("golang.org/x/tools"));
/// assert!(is_package_path("github.com/jackc/pgx/v5"));
/// assert!(!is_package_path("not-a-package"));
/// assert!(!is_package_path("github.com"));
/// ```
#[must_use]
pub fn is_package_path(path: &str) -> bool {
    PACKAGE_PATH.is_match(path)
}

/// A remembered package path with its frecency data.
///
/// # Fields
///
/// - `path`: package path, unique within a store
/// - `score`: opaque ranking key, starts at [`INITIAL_SCORE`]
/// - `last_accessed`: Unix timestamp (seconds) of creation or latest update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub path: String,
    pub score: f64,
    pub last_accessed: i64,
}

impl Entry {
    /// Creates a fresh entry with the initial score, accessed at `now`.
    ///
    /// No validation happens here; stores validate before inserting.
    #[must_use]
    pub fn new(path: impl Into<String>, now: i64) -> Self {
        Self {
            path: path.into(),
            score: INITIAL_SCORE,
            last_accessed: now,
        }
    }

    /// Returns a human-readable string describing how long ago the entry was used.
    ///
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago"
    /// - Less than 1 day: "Xh ago"
    /// - 1 day or more: "Xd ago"
    ///
    /// # Examples
    ///
    /// ```
    /// use rummage::Entry;
    ///
    /// let now = chrono::Utc::now().timestamp();
    /// let entry = Entry::new("github.com/gorilla/mux", now - 300);
    /// assert_eq!(entry.time_ago(), "5m ago");
    /// ```
    #[must_use]
    pub fn time_ago(&self) -> String {
        let now = chrono::Utc::now().timestamp();
        let diff = now - self.last_accessed;

        if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            let mins = diff / SECONDS_PER_MINUTE;
            format!("{mins}m ago")
        } else if diff < SECONDS_PER_DAY {
            let hours = diff / SECONDS_PER_HOUR;
            format!("{hours}h ago")
        } else {
            let days = diff / SECONDS_PER_DAY;
            format!("{days}d ago")
        }
    }
}
