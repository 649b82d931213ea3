//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the root origin and named paths are well-formed
//! - Check user records are usable (credentials, header syntax)
//! - Validate value ranges (expiry > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system; any error is fatal

use axum::http::header::{HeaderName, HeaderValue};
use axum::http::uri::Authority;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::config::schema::GateConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("target_site.root {root:?} is not a valid origin: {reason}")]
    InvalidRoot { root: String, reason: String },

    #[error("target_site.urls.{name} {path:?} must be a non-empty path starting with '/'")]
    InvalidPath { name: &'static str, path: String },

    #[error("siteminder.session_expiry_minutes must be greater than zero")]
    ZeroSessionExpiry,

    #[error("siteminder.max_login_attempts must be greater than zero")]
    ZeroLockoutThreshold,

    #[error("listener.bind_address {address:?} is not a valid socket address")]
    InvalidBindAddress { address: String },

    #[error("backend.address {address:?} is not a valid host:port authority")]
    InvalidBackendAddress { address: String },

    #[error("observability.metrics_address {address:?} is not a valid socket address")]
    InvalidMetricsAddress { address: String },

    #[error("users.{user}.password must not be empty")]
    EmptyPassword { user: String },

    #[error("users.{user}.auth_headers contains invalid header {header:?}")]
    InvalidAuthHeader { user: String, header: String },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_root(&config.target_site.root, &mut errors);

    let urls = &config.target_site.urls;
    let named_paths: [(&'static str, &str); 8] = [
        ("logoff", &urls.logoff),
        ("not_authenticated", &urls.not_authenticated),
        ("logon", &urls.logon),
        ("protected", &urls.protected),
        ("bad_login", &urls.bad_login),
        ("bad_password", &urls.bad_password),
        ("account_locked", &urls.account_locked),
        ("target", &urls.target),
    ];
    for (name, path) in named_paths {
        if path.is_empty() || !path.starts_with('/') {
            errors.push(ValidationError::InvalidPath {
                name,
                path: path.to_string(),
            });
        }
    }

    if config.siteminder.session_expiry_minutes == 0 {
        errors.push(ValidationError::ZeroSessionExpiry);
    }
    if config.siteminder.max_login_attempts == 0 {
        errors.push(ValidationError::ZeroLockoutThreshold);
    }

    if SocketAddr::from_str(&config.listener.bind_address).is_err() {
        errors.push(ValidationError::InvalidBindAddress {
            address: config.listener.bind_address.clone(),
        });
    }

    if Authority::from_str(&config.backend.address).is_err() {
        errors.push(ValidationError::InvalidBackendAddress {
            address: config.backend.address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && SocketAddr::from_str(&config.observability.metrics_address).is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress {
            address: config.observability.metrics_address.clone(),
        });
    }

    for (name, user) in &config.users {
        if user.password.is_empty() {
            errors.push(ValidationError::EmptyPassword { user: name.clone() });
        }
        for (header, value) in &user.auth_headers {
            if HeaderName::from_bytes(header.as_bytes()).is_err()
                || HeaderValue::from_str(value).is_err()
            {
                errors.push(ValidationError::InvalidAuthHeader {
                    user: name.clone(),
                    header: header.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_root(root: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(root) {
        Ok(url) => {
            if url.host_str().is_none() {
                errors.push(ValidationError::InvalidRoot {
                    root: root.to_string(),
                    reason: "missing host".to_string(),
                });
            } else if !matches!(url.scheme(), "http" | "https") {
                errors.push(ValidationError::InvalidRoot {
                    root: root.to_string(),
                    reason: format!("unsupported scheme {:?}", url.scheme()),
                });
            }
        }
        Err(e) => errors.push(ValidationError::InvalidRoot {
            root: root.to_string(),
            reason: e.to_string(),
        }),
    }
}
