//! Per-buyer order submission history backing the velocity check.
//!
//! RULE: The fraud evaluator never touches the map directly. It goes
//! through the OrderHistory trait so tests can substitute their own store
//! and a server runtime can swap in a shared one.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Read/append access to recent order submissions per buyer.
pub trait OrderHistory: Send + Sync {
    /// Number of recorded submissions for `buyer_id` at or before `until`
    /// and strictly newer than `until - window` (exclusive at exactly
    /// `window` ago).
    fn count_within(&self, buyer_id: &str, until: DateTime<Utc>, window: Duration) -> usize;

    /// Record a submission. The evaluator calls this after counting, so the
    /// submission being evaluated never counts against itself.
    fn record(&self, buyer_id: &str, at: DateTime<Utc>);
}

/// Process-lifetime in-memory history. Interior lock makes a shared
/// reference safe under concurrent callers; entries older than `retention`
/// (measured from the newest submission per buyer) are pruned on every
/// record, so per-buyer growth stays bounded in a long-running process.
///
/// State resets with the process. There is no persistence.
pub struct InMemoryOrderHistory {
    retention: Duration,
    entries: Mutex<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl InMemoryOrderHistory {
    pub fn new(retention: Duration) -> Self {
        Self {
            retention,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of timestamps currently retained for a buyer.
    pub fn recorded_count(&self, buyer_id: &str) -> usize {
        let entries = self.entries.lock().expect("order history lock poisoned");
        entries.get(buyer_id).map_or(0, Vec::len)
    }
}

impl OrderHistory for InMemoryOrderHistory {
    fn count_within(&self, buyer_id: &str, until: DateTime<Utc>, window: Duration) -> usize {
        let entries = self.entries.lock().expect("order history lock poisoned");
        entries.get(buyer_id).map_or(0, |timestamps| {
            timestamps
                .iter()
                .filter(|t| **t <= until && until.signed_duration_since(**t) < window)
                .count()
        })
    }

    fn record(&self, buyer_id: &str, at: DateTime<Utc>) {
        let mut entries = self.entries.lock().expect("order history lock poisoned");
        let timestamps = entries.entry(buyer_id.to_string()).or_default();
        timestamps.push(at);

        // Prune against the newest submission, not `at`, so an out-of-order
        // arrival cannot wipe newer entries.
        if let Some(newest) = timestamps.iter().max().copied() {
            let retention = self.retention;
            timestamps.retain(|t| newest.signed_duration_since(*t) < retention);
        }
    }
}
