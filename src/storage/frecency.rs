//! Frecency score calculation.
//!
//! Implements a two-regime "frecency" (frequency + recency) curve. Recent use
//! is rewarded additively so active packages climb quickly, while long idle
//! periods decay the score multiplicatively:
//!
//! ```text
//! idle time        new score
//! < 1 hour         score + 4.0
//! < 1 day          score + 2.0
//! < 1 week         score * 0.5
//! otherwise        score * 0.25
//! ```
//!
//! Nothing here touches a store. Callers persist the result through
//! [`crate::storage::Store::update`].

use crate::domain::Entry;

/// Number of seconds per hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds per day.
const SECONDS_PER_DAY: i64 = SECONDS_PER_HOUR * 24;

/// Number of seconds per week.
const SECONDS_PER_WEEK: i64 = SECONDS_PER_DAY * 7;

/// Calculates the score an entry should carry after being used at `now`.
///
/// # Examples
///
/// ```
/// use rummage::{calculate_score, Entry};
///
/// let now = 1_700_000_000;
/// assert_eq!(calculate_score(&Entry::new("a.com/x/y", now - 30), now), 5.0);
/// assert_eq!(calculate_score(&Entry::new("a.com/x/y", now - 2 * 3600), now), 3.0);
/// assert_eq!(calculate_score(&Entry::new("a.com/x/y", now - 2 * 86400), now), 0.5);
/// assert_eq!(calculate_score(&Entry::new("a.com/x/y", now - 14 * 86400), now), 0.25);
/// ```
#[must_use]
pub fn calculate_score(entry: &Entry, now: i64) -> f64 {
    let elapsed = now - entry.last_accessed;

    if elapsed < SECONDS_PER_HOUR {
        entry.score + 4.0
    } else if elapsed < SECONDS_PER_DAY {
        entry.score + 2.0
    } else if elapsed < SECONDS_PER_WEEK {
        entry.score * 0.5
    } else {
        entry.score * 0.25
    }
}

impl Entry {
    /// Recalculates this entry's score against the current wall clock.
    ///
    /// See [`calculate_score`].
    #[must_use]
    pub fn recalculate_score(&self) -> f64 {
        calculate_score(self, chrono::Utc::now().timestamp())
    }
}

/// Sorts entries by stored score in descending order.
///
/// The sort is stable, so entries with equal scores keep their relative order.
pub fn sort_by_frecency(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
}
