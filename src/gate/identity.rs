//! Identity header injection.
//!
//! On a successful authentication the gate asserts the user's identity
//! to the backend by copying the user's configured `auth_headers` onto
//! the outbound header set, names and values verbatim.

use axum::http::header::{HeaderName, HeaderValue};
use axum::http::HeaderMap;

use crate::config::schema::UserConfig;

/// Copy a user's configured identity headers onto `headers`.
///
/// A user with no configured headers is a no-op, not an error. Header
/// names are not checked against any fixed set; whatever is configured
/// is forwarded. Entries that cannot be encoded as HTTP headers are
/// rejected at config validation, so a failure here is logged as an
/// invariant violation and skipped.
pub fn inject(headers: &mut HeaderMap, user: &UserConfig) {
    for (name, value) in &user.auth_headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => {
                tracing::error!(header = %name, "configured auth header failed encoding");
            }
        }
    }
}
