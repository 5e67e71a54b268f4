//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routing and HTTP layers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log events of a request via a span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
