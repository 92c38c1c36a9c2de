//! Reading cache subsystem.
//!
//! # Responsibilities
//! - Hold the last complete reading per location, with its acquisition time
//! - Answer staleness questions before the coordinator decides to refetch
//!
//! # Design Decisions
//! - In memory only; nothing survives the process
//! - One entry per location, overwritten whole on refresh (last write wins)
//! - Default readings are never stored
//! - No eviction: the key set is bounded by the visible locations

pub mod store;

pub use store::{is_stale, CacheEntry, ReadingCache, DEFAULT_TTL};
