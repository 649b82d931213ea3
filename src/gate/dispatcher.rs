//! The session-gated request dispatcher.
//!
//! Top-level entry point of the gate: classifies each request, runs the
//! matching flow, and resolves to a tagged decision the transport layer
//! consumes. Forward-vs-redirect is always explicit in the returned tag,
//! never implied by an absent status code.

use axum::http::header::HeaderValue;
use axum::http::{HeaderMap, Method};
use std::sync::Arc;
use url::Url;

use crate::config::loader::ConfigError;
use crate::config::schema::GateConfig;
use crate::config::validation::ValidationError;
use crate::gate::attempts::AttemptTracker;
use crate::gate::classify::{classify, RouteClass};
use crate::gate::logon::LogonHandler;
use crate::gate::validator::{SessionState, SessionValidator};
use crate::gate::{absolute_url, cookie, identity};
use crate::observability::metrics;
use crate::session::SessionStore;

/// Header stamped on every classified request with the site's host:port.
pub const PROXIED_BY: &str = "x-proxied-by";

/// What the transport layer should do with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Pass the request through to the backend.
    Forward,
    /// Respond 302 with this absolute Location; nothing is forwarded.
    Redirect(String),
}

impl Decision {
    /// Label used for logging and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Forward => "forward",
            Decision::Redirect(_) => "redirect",
        }
    }
}

/// A finalized per-request outcome: the decision plus every header the
/// gate wants on the outbound side (Set-Cookie, x-proxied-by, identity
/// headers). The transport layer applies the headers to whichever
/// surface the decision selects.
#[derive(Debug)]
pub struct GateOutcome {
    pub decision: Decision,
    pub headers: HeaderMap,
}

/// Composes classifier, session validator, logon handler, cookie codec
/// and identity injector into one per-request entry point.
///
/// The dispatcher owns no long-lived state of its own; sessions live in
/// the [`SessionStore`], attempt counters in the [`AttemptTracker`], and
/// configuration is immutable after construction.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<GateConfig>,
    sessions: SessionStore,
    validator: SessionValidator,
    logon: LogonHandler,
    root: String,
    cookie_domain: String,
    proxied_by: HeaderValue,
}

impl Dispatcher {
    /// Build a dispatcher from validated configuration.
    pub fn new(config: Arc<GateConfig>) -> Result<Self, ConfigError> {
        let origin = Url::parse(&config.target_site.root).map_err(|e| {
            ConfigError::Validation(vec![ValidationError::InvalidRoot {
                root: config.target_site.root.clone(),
                reason: e.to_string(),
            }])
        })?;
        let host = origin
            .host_str()
            .ok_or_else(|| {
                ConfigError::Validation(vec![ValidationError::InvalidRoot {
                    root: config.target_site.root.clone(),
                    reason: "missing host".to_string(),
                }])
            })?
            .to_string();
        let proxy_host = match origin.port_or_known_default() {
            Some(port) => format!("{host}:{port}"),
            None => host.clone(),
        };
        let proxied_by = HeaderValue::from_str(&proxy_host).map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidRoot {
                root: config.target_site.root.clone(),
                reason: "host is not a valid header value".to_string(),
            }])
        })?;

        let root = config.target_site.root.trim_end_matches('/').to_string();
        let sessions = SessionStore::new();
        let attempts = AttemptTracker::new();
        let validator =
            SessionValidator::new(sessions.clone(), config.siteminder.session_ttl());
        let logon = LogonHandler::new(
            config.clone(),
            sessions.clone(),
            attempts,
            root.clone(),
            host.clone(),
        );

        Ok(Self {
            config,
            sessions,
            validator,
            logon,
            root,
            cookie_domain: host,
            proxied_by,
        })
    }

    /// Dispatch one request to its finalized outcome.
    ///
    /// The session store is the only collaborator that could suspend in
    /// a real deployment, so the entry point is async even though the
    /// in-memory store never blocks.
    pub async fn dispatch(
        &self,
        method: &Method,
        url: &str,
        cookie_header: Option<&str>,
        post_data: Option<&[u8]>,
    ) -> GateOutcome {
        let mut headers = HeaderMap::new();
        headers.insert(PROXIED_BY, self.proxied_by.clone());

        let class = classify(method, url, &self.root, &self.config.target_site.urls);
        let token = cookie::extract_token(cookie_header);

        let decision = match class {
            RouteClass::Logoff => self.handle_logoff(token.as_deref(), &mut headers),
            RouteClass::Logon => self
                .logon
                .handle(token.as_deref(), post_data, &mut headers),
            RouteClass::Protected => self.handle_protected(token.as_deref(), &mut headers),
            RouteClass::Public => Decision::Forward,
        };

        tracing::debug!(
            method = %method,
            url,
            class = class.as_str(),
            decision = decision.as_str(),
            "request dispatched"
        );
        metrics::record_dispatch(class.as_str(), decision.as_str());

        GateOutcome { decision, headers }
    }

    /// Logoff: drop the presented session (others untouched), overwrite
    /// the cookie with the sentinel, and let the logout page itself pass
    /// through to the backend.
    fn handle_logoff(&self, token: Option<&str>, headers: &mut HeaderMap) -> Decision {
        if let Some(token) = token {
            if self.sessions.delete(token).is_some() {
                tracing::info!("session logged off");
            }
        }
        cookie::revoke(headers, &self.cookie_domain);
        Decision::Forward
    }

    /// Protected path: run the session state machine.
    fn handle_protected(&self, token: Option<&str>, headers: &mut HeaderMap) -> Decision {
        match self.validator.evaluate(token) {
            SessionState::Authenticated(session) => {
                if let Some(user) = self.config.users.get(&session.user) {
                    identity::inject(headers, user);
                }
                cookie::issue(headers, &session.token, &self.cookie_domain);
                Decision::Forward
            }
            // No cookie, unknown token and expired token all land here;
            // no cookie is written on the way out.
            SessionState::NoCookie | SessionState::Unknown => Decision::Redirect(absolute_url(
                &self.root,
                &self.config.target_site.urls.not_authenticated,
            )),
        }
    }

    /// The session store, shared with tests and diagnostics.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
