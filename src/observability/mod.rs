//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log output (stdout, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (endpoint, id, path, request_id)
//! - Request ID flows from the HTTP layer into dispatch logs
//! - Metrics are cheap (atomic increments); recorded even when no exporter
//!   is installed

pub mod logging;
pub mod metrics;
