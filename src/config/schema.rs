//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The site being protected: root origin and named URL paths.
    pub target_site: TargetSite,

    /// Agent behavior: session lifetime and lockout policy.
    pub siteminder: SiteminderConfig,

    /// The backend requests are forwarded to after passing the gate.
    pub backend: BackendConfig,

    /// User table: credentials and per-user identity headers.
    pub users: BTreeMap<String, UserConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GateConfig {
    /// Effective lockout threshold for a user record.
    pub fn lockout_threshold(&self, user: &UserConfig) -> u32 {
        user.lockout_threshold
            .unwrap_or(self.siteminder.max_login_attempts)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// The protected site: root origin plus the named paths the gate acts on.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetSite {
    /// Root origin of the site (e.g., "http://localhost:8000").
    /// Redirect targets are absolute URLs under this root, and the
    /// `x-proxied-by` header carries its host:port.
    pub root: String,

    /// Named URL paths, relative to the root.
    pub urls: UrlMap,
}

impl Default for TargetSite {
    fn default() -> Self {
        Self {
            root: "http://localhost:8000".to_string(),
            urls: UrlMap::default(),
        }
    }
}

/// Named paths the classifier and the logon flow redirect to.
///
/// `protected` is a path *prefix*; everything else is matched exactly.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UrlMap {
    /// Logoff page. Requesting it revokes the session cookie.
    pub logoff: String,

    /// Redirect target for requests without a valid session.
    pub not_authenticated: String,

    /// Logon form handler. Only POSTs to this path are logon attempts.
    pub logon: String,

    /// Prefix of paths requiring an authenticated session.
    pub protected: String,

    /// Redirect target when the submitted username is unknown.
    pub bad_login: String,

    /// Redirect target when the submitted password is wrong.
    pub bad_password: String,

    /// Redirect target when the account is locked out.
    pub account_locked: String,

    /// Redirect target after a successful logon.
    pub target: String,
}

impl Default for UrlMap {
    fn default() -> Self {
        Self {
            logoff: "/system/logout".to_string(),
            not_authenticated: "/system/error/notauthenticated".to_string(),
            logon: "/public/logon".to_string(),
            protected: "/protected".to_string(),
            bad_login: "/system/error/badlogin".to_string(),
            bad_password: "/system/error/badpassword".to_string(),
            account_locked: "/system/error/accountlocked".to_string(),
            target: "/protected/home".to_string(),
        }
    }
}

/// Session lifetime and lockout policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteminderConfig {
    /// Sliding session expiry window in minutes.
    pub session_expiry_minutes: u64,

    /// Failed logon attempts allowed before an account locks.
    /// A user record may override this with its own `lockout_threshold`.
    pub max_login_attempts: u32,
}

impl SiteminderConfig {
    /// The sliding expiry window as a duration.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_expiry_minutes * 60)
    }
}

impl Default for SiteminderConfig {
    fn default() -> Self {
        Self {
            session_expiry_minutes: 20,
            max_login_attempts: 3,
        }
    }
}

/// Backend server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// A configured user of the protected site.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UserConfig {
    /// Credential reference the submitted password is compared against.
    pub password: String,

    /// Headers asserted to the backend on the user's behalf.
    /// Copied verbatim; names are not validated against any fixed set.
    pub auth_headers: BTreeMap<String, String>,

    /// Per-user lockout threshold. Falls back to
    /// `siteminder.max_login_attempts` when unset.
    pub lockout_threshold: Option<u32>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
