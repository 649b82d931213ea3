//! Request classification.
//!
//! # Responsibilities
//! - Strip the configured root origin from absolute-form URLs
//! - Map the remaining path to exactly one route class
//!
//! # Design Decisions
//! - Classification is a pure function with no side effects
//! - Precedence is fixed: logoff (exact) → logon (POST + exact) →
//!   protected (prefix) → public; no two classes can overlap
//! - No regex; exact and prefix matching only

use axum::http::Method;

use crate::config::schema::UrlMap;

/// The four route classes the dispatcher acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Exact match on the logoff path.
    Logoff,
    /// POST with an exact match on the logon path.
    Logon,
    /// Path begins with the protected prefix.
    Protected,
    /// Everything else passes through untouched.
    Public,
}

impl RouteClass {
    /// Label used for logging and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            RouteClass::Logoff => "logoff",
            RouteClass::Logon => "logon",
            RouteClass::Protected => "protected",
            RouteClass::Public => "public",
        }
    }
}

/// Classify a request by method and URL.
///
/// `url` may be absolute-form (as proxied requests arrive) or origin-form;
/// the configured root is stripped when present.
pub fn classify(method: &Method, url: &str, root: &str, urls: &UrlMap) -> RouteClass {
    let path = request_path(url, root);

    if path == urls.logoff {
        return RouteClass::Logoff;
    }
    if method == Method::POST && path == urls.logon {
        return RouteClass::Logon;
    }
    if path.starts_with(urls.protected.as_str()) {
        return RouteClass::Protected;
    }
    RouteClass::Public
}

/// The request path relative to the site root, without query or fragment.
pub fn request_path<'a>(url: &'a str, root: &str) -> &'a str {
    let rest = url.strip_prefix(root).unwrap_or(url);
    let rest = match rest.find(['?', '#']) {
        Some(cut) => &rest[..cut],
        None => rest,
    };
    if rest.is_empty() {
        "/"
    } else {
        rest
    }
}
