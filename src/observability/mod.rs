//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request IDs flow through spans so one request's events correlate
//! - Metric updates are cheap (atomic increments); disabled exporters
//!   cost nothing but a no-op recorder

pub mod logging;
pub mod metrics;
