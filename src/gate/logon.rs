//! The logon flow: credential check, lockout, session issuance.
//!
//! # Flow (order matters)
//! ```text
//! POST to the logon path
//!     1. delete any session named by the presented cookie (even expired)
//!     2. unknown user          → redirect bad_login    (counters untouched)
//!     3. counter >= threshold  → redirect account_locked (no password compare)
//!     4. password mismatch     → count += 1, redirect bad_password
//!        password match       → count = 0, fresh session + cookie,
//!                               redirect target
//! ```
//!
//! Lockout is checked before the password so a correct password cannot
//! unlock an account. Every branch ends in a redirect to its own
//! configured URI; failures here are outcomes, not errors.

use axum::http::HeaderMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::schema::GateConfig;
use crate::gate::attempts::AttemptTracker;
use crate::gate::dispatcher::Decision;
use crate::gate::{absolute_url, cookie};
use crate::observability::metrics;
use crate::session::{token, Session, SessionStore};

/// Credentials submitted by the logon form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogonForm {
    pub username: String,
    pub password: String,
}

impl LogonForm {
    /// Parse a urlencoded form body. Returns `None` unless both a
    /// `username` and a `password` field are present.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let mut username = None;
        let mut password = None;
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "username" => username = Some(value.into_owned()),
                "password" => password = Some(value.into_owned()),
                _ => {}
            }
        }
        Some(Self {
            username: username?,
            password: password?,
        })
    }
}

/// Handles POSTs to the logon path.
#[derive(Clone)]
pub struct LogonHandler {
    config: Arc<GateConfig>,
    sessions: SessionStore,
    attempts: AttemptTracker,
    root: String,
    cookie_domain: String,
}

impl LogonHandler {
    pub fn new(
        config: Arc<GateConfig>,
        sessions: SessionStore,
        attempts: AttemptTracker,
        root: String,
        cookie_domain: String,
    ) -> Self {
        Self {
            config,
            sessions,
            attempts,
            root,
            cookie_domain,
        }
    }

    /// Run one logon attempt to its terminal redirect.
    ///
    /// `presented_token` is whatever the cookie codec extracted from the
    /// request; `post_data` is the raw form body. The returned decision
    /// is the finalized outcome; handing it back is the completion
    /// signal the transport layer acts on.
    pub fn handle(
        &self,
        presented_token: Option<&str>,
        post_data: Option<&[u8]>,
        headers: &mut HeaderMap,
    ) -> Decision {
        // Logging in as someone new invalidates whatever session the
        // browser was carrying, live or expired, before any credential
        // is looked at.
        if let Some(token) = presented_token {
            if self.sessions.delete(token).is_some() {
                tracing::debug!("destroyed prior session presented with logon");
            }
        }

        let urls = &self.config.target_site.urls;

        let Some(form) = post_data.and_then(LogonForm::from_body) else {
            tracing::info!("logon rejected: unparseable credentials");
            metrics::record_logon("bad_login");
            return self.redirect(&urls.bad_login);
        };

        let Some(user) = self.config.users.get(&form.username) else {
            tracing::info!(user = %form.username, "logon rejected: unknown user");
            metrics::record_logon("bad_login");
            return self.redirect(&urls.bad_login);
        };

        let threshold = self.config.lockout_threshold(user);
        if self.attempts.count(&form.username) >= threshold {
            tracing::warn!(user = %form.username, threshold, "logon rejected: account locked");
            metrics::record_logon("account_locked");
            return self.redirect(&urls.account_locked);
        }

        if form.password != user.password {
            let count = self.attempts.record_failure(&form.username);
            tracing::info!(user = %form.username, attempts = count, "logon rejected: bad password");
            metrics::record_logon("bad_password");
            return self.redirect(&urls.bad_password);
        }

        self.attempts.reset(&form.username);
        let token = token::generate();
        self.sessions.put(Session::new(
            token.clone(),
            form.username.clone(),
            self.session_ttl(),
        ));
        cookie::issue(headers, &token, &self.cookie_domain);
        tracing::info!(user = %form.username, "logon succeeded");
        metrics::record_logon("success");
        self.redirect(&urls.target)
    }

    fn session_ttl(&self) -> Duration {
        self.config.siteminder.session_ttl()
    }

    fn redirect(&self, path: &str) -> Decision {
        Decision::Redirect(absolute_url(&self.root, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::UserConfig;
    use axum::http::header::SET_COOKIE;
    use std::time::SystemTime;

    fn test_config() -> Arc<GateConfig> {
        let mut config = GateConfig::default();
        let mut bob = UserConfig::default();
        bob.password = "test1234".to_string();
        bob.auth_headers.insert("header1".into(), "auth1".into());
        config.users.insert("bob".into(), bob);
        Arc::new(config)
    }

    struct Fixture {
        handler: LogonHandler,
        sessions: SessionStore,
        attempts: AttemptTracker,
    }

    fn fixture() -> Fixture {
        fixture_with(test_config())
    }

    fn fixture_with(config: Arc<GateConfig>) -> Fixture {
        let sessions = SessionStore::new();
        let attempts = AttemptTracker::new();
        let handler = LogonHandler::new(
            config,
            sessions.clone(),
            attempts.clone(),
            "http://localhost:8000".into(),
            "localhost".into(),
        );
        Fixture {
            handler,
            sessions,
            attempts,
        }
    }

    fn form(username: &str, password: &str) -> Vec<u8> {
        format!("username={username}&password={password}").into_bytes()
    }

    #[test]
    fn parses_urlencoded_form() {
        let form = LogonForm::from_body(b"username=bob&password=p%40ss").unwrap();
        assert_eq!(form.username, "bob");
        assert_eq!(form.password, "p@ss");
    }

    #[test]
    fn form_requires_both_fields() {
        assert!(LogonForm::from_body(b"username=bob").is_none());
        assert!(LogonForm::from_body(b"password=x").is_none());
        assert!(LogonForm::from_body(b"").is_none());
    }

    #[test]
    fn unknown_user_redirects_to_bad_login_without_counting() {
        let fx = fixture();
        let mut headers = HeaderMap::new();

        let decision = fx
            .handler
            .handle(None, Some(&form("mallory", "whatever")), &mut headers);

        assert_eq!(
            decision,
            Decision::Redirect("http://localhost:8000/system/error/badlogin".into())
        );
        assert_eq!(fx.attempts.count("mallory"), 0);
        assert!(headers.get(SET_COOKIE).is_none());
    }

    #[test]
    fn missing_body_redirects_to_bad_login() {
        let fx = fixture();
        let mut headers = HeaderMap::new();

        let decision = fx.handler.handle(None, None, &mut headers);

        assert_eq!(
            decision,
            Decision::Redirect("http://localhost:8000/system/error/badlogin".into())
        );
    }

    #[test]
    fn bad_password_counts_and_redirects() {
        let fx = fixture();
        let mut headers = HeaderMap::new();

        let decision = fx
            .handler
            .handle(None, Some(&form("bob", "wrong")), &mut headers);

        assert_eq!(
            decision,
            Decision::Redirect("http://localhost:8000/system/error/badpassword".into())
        );
        assert_eq!(fx.attempts.count("bob"), 1);
        assert!(headers.get(SET_COOKIE).is_none());
    }

    #[test]
    fn lockout_wins_over_correct_password() {
        let fx = fixture();
        let mut headers = HeaderMap::new();

        // Default threshold is 3.
        for _ in 0..3 {
            fx.handler
                .handle(None, Some(&form("bob", "wrong")), &mut headers);
        }

        let decision = fx
            .handler
            .handle(None, Some(&form("bob", "test1234")), &mut headers);

        assert_eq!(
            decision,
            Decision::Redirect("http://localhost:8000/system/error/accountlocked".into())
        );
        assert!(fx.sessions.is_empty());
        assert!(headers.get(SET_COOKIE).is_none());
    }

    #[test]
    fn per_user_threshold_overrides_global() {
        let mut config = GateConfig::default();
        let mut bob = UserConfig::default();
        bob.password = "test1234".to_string();
        bob.lockout_threshold = Some(1);
        config.users.insert("bob".into(), bob);
        let fx = fixture_with(Arc::new(config));
        let mut headers = HeaderMap::new();

        fx.handler
            .handle(None, Some(&form("bob", "wrong")), &mut headers);
        let decision = fx
            .handler
            .handle(None, Some(&form("bob", "test1234")), &mut headers);

        assert_eq!(
            decision,
            Decision::Redirect("http://localhost:8000/system/error/accountlocked".into())
        );
    }

    #[test]
    fn success_creates_session_issues_cookie_and_resets_counter() {
        let fx = fixture();
        let mut headers = HeaderMap::new();
        fx.handler
            .handle(None, Some(&form("bob", "wrong")), &mut headers);
        assert_eq!(fx.attempts.count("bob"), 1);

        let mut headers = HeaderMap::new();
        let decision = fx
            .handler
            .handle(None, Some(&form("bob", "test1234")), &mut headers);

        assert_eq!(
            decision,
            Decision::Redirect("http://localhost:8000/protected/home".into())
        );
        assert_eq!(fx.attempts.count("bob"), 0);

        let cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        let token = cookie
            .strip_prefix("SMSESSION=")
            .unwrap()
            .split(';')
            .next()
            .unwrap();
        let session = fx.sessions.get(token).unwrap();
        assert_eq!(session.user, "bob");
    }

    #[test]
    fn presented_session_is_destroyed_even_when_expired() {
        let fx = fixture();
        fx.sessions.put(Session {
            token: "stale".into(),
            user: "bob".into(),
            expires_at: SystemTime::now() - Duration::from_secs(600),
        });
        let mut headers = HeaderMap::new();

        fx.handler
            .handle(Some("stale"), Some(&form("bob", "test1234")), &mut headers);

        // The stale record is gone; only the freshly minted session remains.
        assert_eq!(fx.sessions.len(), 1);
        assert!(fx.sessions.get("stale").is_none());
    }

    #[test]
    fn presented_session_is_destroyed_before_credential_validation() {
        let fx = fixture();
        fx.sessions
            .put(Session::new("live".into(), "bob".into(), Duration::from_secs(600)));
        let mut headers = HeaderMap::new();

        // Even a failing logon destroys the presented session first.
        fx.handler
            .handle(Some("live"), Some(&form("bob", "wrong")), &mut headers);

        assert!(fx.sessions.is_empty());
    }
}
