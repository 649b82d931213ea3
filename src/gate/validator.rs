//! The protected-path session state machine.
//!
//! # States
//! ```text
//! token absent                      → NoCookie
//! token present, store reads absent → Unknown   (never existed OR expired;
//!                                                callers cannot tell apart)
//! token present and live            → Authenticated (expiry renewed)
//! ```
//!
//! NoCookie and Unknown both resolve to the not-authenticated redirect;
//! Authenticated resolves to a pass-through with renewed expiry.

use std::time::Duration;

use crate::session::{Session, SessionStore};

/// Outcome of evaluating the session presented with a protected request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No token was presented.
    NoCookie,
    /// A token was presented but the store reports it absent: it either
    /// never existed or has expired. Callers cannot and must not tell
    /// the two apart.
    Unknown,
    /// The token resolved to a live session, whose expiry has been
    /// pushed forward by the sliding window.
    Authenticated(Session),
}

/// Evaluates presented tokens against the session store.
#[derive(Clone)]
pub struct SessionValidator {
    sessions: SessionStore,
    ttl: Duration,
}

impl SessionValidator {
    /// Create a validator renewing sessions by `ttl` on success.
    pub fn new(sessions: SessionStore, ttl: Duration) -> Self {
        Self { sessions, ttl }
    }

    /// Run the state machine for one protected request.
    ///
    /// Renewal happens here, atomically with the liveness check, so two
    /// near-simultaneous requests for the same token serialize instead
    /// of racing read-then-renew.
    pub fn evaluate(&self, token: Option<&str>) -> SessionState {
        let Some(token) = token else {
            return SessionState::NoCookie;
        };
        match self.sessions.touch(token, self.ttl) {
            Some(session) => SessionState::Authenticated(session),
            None => SessionState::Unknown,
        }
    }
}
