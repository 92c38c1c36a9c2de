//! Watch mode: keep a location set refreshed on an interval.
//!
//! # Data Flow
//! ```text
//! interval tick
//!     → refresher.rs loads current location set (ArcSwap)
//!     → BatchCoordinator::fetch_all under the process scope
//!     → readings handed to the caller's callback
//!
//! config watcher update
//!     → apply_config_updates swaps the location set atomically
//! ```

pub mod refresher;

pub use refresher::{apply_config_updates, Refresher};
