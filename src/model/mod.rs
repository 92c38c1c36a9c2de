//! Domain model for the acquisition engine.
//!
//! # Data Flow
//! ```text
//! caller supplies Location (immutable)
//!     → source produces Reading (value type)
//!     → resilience::deadline wraps it in an Outcome
//!     → batch maps Outcome → Reading | default Reading | omitted
//! ```
//!
//! # Design Decisions
//! - Readings are plain values; identity lives on the owning Location
//! - Unavailable data is explicit (`Concentration(None)`, `AqiLevel::Unavailable`)
//! - Everything serializes so consumers can hand readings straight to a UI

pub mod location;
pub mod outcome;
pub mod reading;

pub use location::{Coordinates, Location, LocationId};
pub use outcome::Outcome;
pub use reading::{AqiLevel, Concentration, Conditions, Pollutants, Reading};
