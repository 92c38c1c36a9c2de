//! Batch subsystem.
//!
//! # Data Flow
//! ```text
//! fetch_all(locations, scope)
//!     → cache lookup per location (fresh → use as-is)
//!     → stale / missing → DeadlineGuard per location, all in flight at once
//!     → outcomes settle in completion order:
//!         Success     → cache write + real reading
//!         Timeout     → default reading (not cached)
//!         SourceError → default reading (not cached)
//!         Cancelled   → omitted, no cache write
//!     → map with one entry per surviving location
//! ```
//!
//! # Design Decisions
//! - Never fail fast: one bad location cannot sink the batch
//! - Cache writes happen per outcome, not at the end of the batch
//! - Overlapping runs are rejected deterministically (Idle/Running)

pub mod coordinator;

pub use coordinator::{BatchCoordinator, BatchError, BatchState};
