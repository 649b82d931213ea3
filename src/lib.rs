//! Web-access-management gateway library.
//!
//! Emulates the agent that sits in front of a reverse proxy and decides,
//! per request, whether a client may pass through to the protected
//! backend: opaque session cookies, sliding expiry, identity header
//! injection, and a logon flow with failed-attempt lockout.

pub mod config;
pub mod gate;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod session;

pub use config::GateConfig;
pub use gate::{Decision, Dispatcher};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
