//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Consumer starts (screen mounted, CLI command begins):
//!     → scope.rs creates an Active CancellationScope
//!     → every dispatched fetch receives a child token
//!
//! Consumer stops (screen unmounted, Ctrl-C via signals.rs):
//!     → scope.cancel()
//!     → in-flight fetches observe the token and resolve as Cancelled
//!     → coordinator re-checks is_active() before any cache write
//! ```
//!
//! # Design Decisions
//! - One explicit scope object instead of scattered "still mounted" flags
//! - Active → Cancelled is monotonic; cancel() is idempotent
//! - The guarantee is about state mutation, not bytes on the wire

pub mod scope;
pub mod signals;

pub use scope::CancellationScope;
