//! Last-seen tracking for warnings, backing the `seconds_since_last` variable.
//!
//! One [`RateState`] lives for the whole lifetime of the notification engine
//! and is shared by every event. Entries are never evicted.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Warning name → wall-clock time it was last observed.
#[derive(Debug, Default)]
pub struct RateState {
    last_seen: DashMap<String, DateTime<Utc>>,
}

impl RateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `now` for `name` and return the seconds elapsed since the
    /// previous observation, or `f64::INFINITY` on the first one.
    ///
    /// The read of the previous timestamp and the write of `now` happen under
    /// the same shard lock, so concurrent observers of one name never both see
    /// the first occurrence. A clock that stepped backwards yields `0.0`.
    pub fn observe(&self, name: &str, now: DateTime<Utc>) -> f64 {
        match self.last_seen.insert(name.to_string(), now) {
            None => f64::INFINITY,
            Some(previous) => (now - previous)
                .to_std()
                .map(|elapsed| elapsed.as_secs_f64())
                .unwrap_or(0.0),
        }
    }

    pub fn last_seen(&self, name: &str) -> Option<DateTime<Utc>> {
        self.last_seen.get(name).map(|entry| *entry.value())
    }

    /// Number of distinct warning names observed so far.
    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}
