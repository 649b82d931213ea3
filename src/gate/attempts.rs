//! Per-user failed-logon counters.
//!
//! Counters are the one piece of mutable state tied to the user table,
//! so they live here rather than inside the read-only config. Access is
//! keyed by username with the same per-entry discipline the session
//! store uses for tokens.

use dashmap::DashMap;
use std::sync::Arc;

/// Tracks consecutive failed logon attempts per user.
#[derive(Clone, Default)]
pub struct AttemptTracker {
    inner: Arc<DashMap<String, u32>>,
}

impl AttemptTracker {
    /// Create a new tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current consecutive-failure count for a user.
    pub fn count(&self, user: &str) -> u32 {
        self.inner.get(user).map(|count| *count).unwrap_or(0)
    }

    /// Record a failed attempt; returns the new count.
    pub fn record_failure(&self, user: &str) -> u32 {
        let mut entry = self.inner.entry(user.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Reset a user's counter to zero (successful logon).
    pub fn reset(&self, user: &str) {
        self.inner.remove(user);
    }
}
