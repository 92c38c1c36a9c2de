//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stderr (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Scope id flows through batch log events for correlation
//! - Metrics are cheap (atomic increments) and optional
//! - The API key never appears in any log field

pub mod logging;
pub mod metrics;
