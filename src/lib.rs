//! Environmental data acquisition engine.
//!
//! Fetches air-quality and weather readings for a set of map locations,
//! bounds every fetch by a deadline, caches successful readings, and
//! cancels cleanly when its owner goes away.

pub mod batch;
pub mod cache;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod resilience;
pub mod source;
pub mod watch;

pub use batch::{BatchCoordinator, BatchError};
pub use cache::ReadingCache;
pub use config::EngineConfig;
pub use lifecycle::CancellationScope;
pub use model::{Location, LocationId, Outcome, Reading};
pub use resilience::DeadlineGuard;
pub use source::{DataSource, OpenWeatherClient, SourceError};
