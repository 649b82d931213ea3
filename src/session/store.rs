//! Server-side session records and the store that owns them.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::observability::metrics;

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque token carried in the SMSESSION cookie.
    pub token: String,
    /// The user this session belongs to.
    pub user: String,
    /// Absolute expiry. Pushed forward on every authenticated request.
    pub expires_at: SystemTime,
}

impl Session {
    /// Create a session expiring `ttl` from now.
    pub fn new(token: String, user: String, ttl: Duration) -> Self {
        Self {
            token,
            user,
            expires_at: SystemTime::now() + ttl,
        }
    }

    /// A session is live iff its expiry is strictly in the future.
    pub fn is_live(&self, now: SystemTime) -> bool {
        self.expires_at > now
    }
}

/// A thread-safe store mapping session tokens to session records.
///
/// Operations on the same token are atomic (the map locks per entry);
/// operations on different tokens do not block each other. Expired
/// records are treated as absent by every read path; they are pruned
/// when a renewal lands on them, not eagerly swept.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<String, Session>>,
}

impl SessionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a session. Expired records are reported absent even if
    /// still physically stored.
    pub fn get(&self, token: &str) -> Option<Session> {
        let now = SystemTime::now();
        self.inner
            .get(token)
            .filter(|session| session.is_live(now))
            .map(|session| session.value().clone())
    }

    /// Insert a session, replacing any record under the same token.
    pub fn put(&self, session: Session) {
        self.inner.insert(session.token.clone(), session);
        metrics::record_session_count(self.inner.len());
    }

    /// Remove a session. Missing tokens are a no-op.
    pub fn delete(&self, token: &str) -> Option<Session> {
        let removed = self.inner.remove(token).map(|(_, session)| session);
        metrics::record_session_count(self.inner.len());
        removed
    }

    /// Atomically check liveness and push the expiry to `now + ttl`.
    ///
    /// Returns the renewed session, or `None` for unknown and expired
    /// tokens alike. The read and the renewal happen under one entry
    /// guard, so two concurrent touches of the same token serialize and
    /// neither leaves a stale expiry behind. An expired record found
    /// here is pruned.
    pub fn touch(&self, token: &str, ttl: Duration) -> Option<Session> {
        let now = SystemTime::now();
        if let Some(mut entry) = self.inner.get_mut(token) {
            if entry.is_live(now) {
                entry.expires_at = now + ttl;
                return Some(entry.value().clone());
            }
        } else {
            return None;
        }
        // The token resolved to an expired record; the guard is released,
        // so it can be dropped for real.
        self.inner.remove(token);
        metrics::record_session_count(self.inner.len());
        None
    }

    /// Number of records physically present, live or not.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when no records are physically present.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Counts of (live, expired) records currently held.
    pub fn summary(&self) -> (usize, usize) {
        let now = SystemTime::now();
        let mut live = 0;
        let mut expired = 0;
        for record in self.inner.iter() {
            if record.is_live(now) {
                live += 1;
            } else {
                expired += 1;
            }
        }
        (live, expired)
    }
}
