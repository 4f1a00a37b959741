//! Rolling per-minute message rate
//!
//! Counts decoded monitor lines per UTC minute (keyed by the line's
//! normalized timestamp, not arrival time, so replayed traffic lands in
//! the right bucket) and prunes buckets that fall out of the window.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, DurationRound, Utc};

/// Default histogram window in minutes
const DEFAULT_WINDOW_MINUTES: i64 = 60;

/// Per-minute message counter over a sliding window
#[derive(Debug)]
pub struct RateHistogram {
    counts: BTreeMap<DateTime<Utc>, u64>,
    window: Duration,
}

impl Default for RateHistogram {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MINUTES)
    }
}

impl RateHistogram {
    /// Create a histogram covering the last `window_minutes` minutes
    pub fn new(window_minutes: i64) -> Self {
        Self {
            counts: BTreeMap::new(),
            window: Duration::minutes(window_minutes),
        }
    }

    /// Count one message at the given instant and prune expired buckets
    pub fn record(&mut self, at: DateTime<Utc>) {
        let key = minute_key(at);
        *self.counts.entry(key).or_insert(0) += 1;
        self.prune(at);
    }

    /// Drop buckets older than the window relative to `now`
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = minute_key(now) - self.window;
        self.counts.retain(|key, _| *key >= cutoff);
    }

    /// Buckets in chronological order
    pub fn per_minute(&self) -> impl Iterator<Item = (DateTime<Utc>, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    /// Total messages across the retained window
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Truncate an instant to its minute
fn minute_key(at: DateTime<Utc>) -> DateTime<Utc> {
    // Truncation to a whole minute cannot fail.
    at.duration_trunc(Duration::minutes(1)).unwrap_or(at)
}
