//! Session state subsystem.
//!
//! # Data Flow
//! ```text
//! Logon success
//!     → token.rs (mint opaque token)
//!     → store.rs (insert {token, user, expires_at})
//!
//! Authenticated request
//!     → store.rs touch() (liveness check + sliding renewal, atomic per token)
//!
//! Logoff / re-logon
//!     → store.rs delete()
//! ```
//!
//! # Design Decisions
//! - The store exclusively owns session records; no raw map is exposed
//! - Expired records are reported absent on every read path, whether or
//!   not they are still physically present
//! - Per-token operations are atomic (sharded map, per-entry locking);
//!   different tokens never block each other

pub mod store;
pub mod token;

pub use store::{Session, SessionStore};
