//! The session gate: classification, validation, logon, dispatch.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, URL, Cookie header, POST body)
//!     → dispatcher.rs (entry point; stamps x-proxied-by)
//!     → classify.rs (logoff | logon | protected | public)
//!         logoff    → session delete + cookie.rs revoke → Forward
//!         logon     → logon.rs credential state machine → Redirect
//!         protected → validator.rs session state machine
//!                       authenticated → identity.rs + cookie re-issue → Forward
//!                       otherwise     → Redirect(not_authenticated)
//!         public    → Forward
//!     → GateOutcome {decision, headers} consumed by the transport layer
//! ```
//!
//! # Design Decisions
//! - Every failure class redirects to its own configured URI; none of
//!   them is an error in the Rust sense
//! - Components receive decoded tokens; raw cookie text never leaves
//!   cookie.rs
//! - The dispatcher returns a tagged decision; transport never infers
//!   pass-through from an absent status code

pub mod attempts;
pub mod classify;
pub mod cookie;
pub mod dispatcher;
pub mod identity;
pub mod logon;
pub mod validator;

pub use classify::RouteClass;
pub use dispatcher::{Decision, Dispatcher, GateOutcome};
pub use validator::SessionState;

/// Absolute redirect target under the site root.
pub(crate) fn absolute_url(root: &str, path: &str) -> String {
    format!("{root}{path}")
}
