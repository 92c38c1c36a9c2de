//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Fetch dispatched by the coordinator:
//!     → deadline.rs (race fetch vs budget vs scope cancellation)
//!     → exactly one Outcome: Success | SourceError | Timeout | Cancelled
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - Budgets are per location, never per batch
//! - No automatic retries: a failed location degrades to its default reading

pub mod deadline;

pub use deadline::DeadlineGuard;
