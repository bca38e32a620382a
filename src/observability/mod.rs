//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! resolver / scheduler / HTTP surface
//!     → tracing (structured log events)
//!     → metrics.rs (counters and gauges)
//!         → Prometheus scrape endpoint (daemon only)
//! ```
//!
//! # Design Decisions
//! - Metric updates are cheap and fire-and-forget; the library records
//!   through the `metrics` facade and only the daemon installs an exporter

pub mod metrics;
