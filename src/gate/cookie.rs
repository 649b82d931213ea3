//! The SMSESSION cookie codec.
//!
//! # Responsibilities
//! - Read the session token out of an inbound Cookie header
//! - Write the outbound Set-Cookie header (issue and revoke)
//!
//! # Design Decisions
//! - All raw cookie-string parsing lives here; everything else in the
//!   gate handles decoded token values only
//! - A malformed Cookie header reads the same as no header at all
//! - Revocation writes the LOGGEDOFF sentinel instead of unsetting the
//!   cookie: the sentinel value is part of the wire contract and stays
//!   visible to any intermediary inspecting cookie values

use axum::http::header::{HeaderValue, SET_COOKIE};
use axum::http::HeaderMap;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "SMSESSION";

/// Sentinel value written on logoff.
pub const LOGGED_OFF: &str = "LOGGEDOFF";

/// Extract the session token from a Cookie header, if present.
///
/// Tolerates a missing header, the named cookie missing among others,
/// and malformed pairs; all of those read as "no token".
pub fn extract_token(cookie_header: Option<&str>) -> Option<String> {
    let header = cookie_header?;
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Set the SMSESSION cookie to `token`, scoped to `domain`, HttpOnly.
pub fn issue(headers: &mut HeaderMap, token: &str, domain: &str) {
    let cookie = format!("{SESSION_COOKIE}={token}; Domain={domain}; Path=/; HttpOnly");
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            headers.append(SET_COOKIE, value);
        }
        Err(_) => {
            // Token and domain are gate-generated and config-validated;
            // reaching this is an invariant violation.
            tracing::error!(domain, "Set-Cookie value failed header encoding");
        }
    }
}

/// Overwrite the SMSESSION cookie with the LOGGEDOFF sentinel.
pub fn revoke(headers: &mut HeaderMap, domain: &str) {
    issue(headers, LOGGED_OFF, domain);
}
