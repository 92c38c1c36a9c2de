//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (budgets > 0, coordinates on the globe)
//! - Detect duplicate location ids
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EngineConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::EngineConfig;
use crate::model::Coordinates;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("source.base_url '{0}' is not a valid URL")]
    InvalidBaseUrl(String),

    #[error("deadline.budget_ms must be greater than zero")]
    ZeroBudget,

    #[error("cache.ttl_secs must be greater than zero")]
    ZeroTtl,

    #[error("watch.interval_secs must be greater than zero")]
    ZeroWatchInterval,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("location #{index} has an empty id")]
    EmptyLocationId { index: usize },

    #[error("location '{0}' is listed more than once")]
    DuplicateLocationId(String),

    #[error("location '{id}' has coordinates {lat},{lon} outside the valid range")]
    InvalidCoordinates { id: String, lat: f64, lon: f64 },
}

/// Check every semantic rule and report all violations.
pub fn validate_config(config: &EngineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if url::Url::parse(&config.source.base_url).is_err() {
        errors.push(ValidationError::InvalidBaseUrl(config.source.base_url.clone()));
    }
    if config.deadline.budget_ms == 0 {
        errors.push(ValidationError::ZeroBudget);
    }
    if config.cache.ttl_secs == 0 {
        errors.push(ValidationError::ZeroTtl);
    }
    if config.watch.interval_secs == 0 {
        errors.push(ValidationError::ZeroWatchInterval);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for (index, location) in config.locations.iter().enumerate() {
        if location.id.trim().is_empty() {
            errors.push(ValidationError::EmptyLocationId { index });
            continue;
        }
        if !seen.insert(location.id.as_str()) {
            errors.push(ValidationError::DuplicateLocationId(location.id.clone()));
        }
        if !Coordinates::new(location.lat, location.lon).is_valid() {
            errors.push(ValidationError::InvalidCoordinates {
                id: location.id.clone(),
                lat: location.lat,
                lon: location.lon,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
