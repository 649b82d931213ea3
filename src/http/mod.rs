//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, body buffering)
//!     → gate::Dispatcher (decision + outbound headers)
//!     → Redirect: 302 built here
//!     → Forward:  forward.rs proxies to the backend
//! ```

pub mod forward;
pub mod server;

pub use forward::Forwarder;
pub use server::HttpServer;
