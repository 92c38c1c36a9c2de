//! Data Source Client subsystem.
//!
//! # Data Flow
//! ```text
//! Coordinates
//!     → client.rs (GET /air_pollution + GET /weather, concurrently)
//!     → payload.rs (serde decoding of the raw bodies)
//!     → normalize.rs (AQI rescale, level bucket, pollutant rounding)
//!     → Reading | SourceError
//! ```
//!
//! # Design Decisions
//! - A source never touches the cache or any shared state
//! - Any non-2xx status, transport failure or undecodable body is a `SourceError`
//! - Normalization is pure so it is tested without a network
//! - The `DataSource` trait is the seam the coordinator is generic over

pub mod client;
pub mod normalize;
pub mod payload;
pub mod types;

pub use client::{DataSource, OpenWeatherClient};
pub use types::{ClientInitError, Endpoint, SourceError, SourceResult};
