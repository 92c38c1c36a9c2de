//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files. Every
//! section has defaults so a minimal file only lists its locations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::model::Location;

/// Root configuration for the acquisition engine.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Upstream air-quality / weather provider.
    pub source: SourceConfig,

    /// Per-location fetch budget.
    pub deadline: DeadlineConfig,

    /// Reading cache settings.
    pub cache: CacheConfig,

    /// Periodic refresh settings for watch mode.
    pub watch: WatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Locations to report on.
    pub locations: Vec<LocationConfig>,
}

impl EngineConfig {
    /// Configured locations as domain values.
    pub fn locations(&self) -> Vec<Location> {
        self.locations.iter().map(LocationConfig::to_location).collect()
    }
}

/// Upstream provider configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL; `/air_pollution` and `/weather` are appended.
    pub base_url: String,

    /// Provider API key. Prefer the `OPENWEATHER_API_KEY` environment variable.
    pub api_key: String,

    /// User-Agent header sent upstream.
    pub user_agent: String,

    /// Idle keep-alive connections kept per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            api_key: String::new(),
            user_agent: "aqi-engine/0.1".to_string(),
            pool_max_idle_per_host: 8,
        }
    }
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .finish()
    }
}

/// Deadline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeadlineConfig {
    /// Budget for one location's fetch pair, in milliseconds.
    pub budget_ms: u64,
}

impl DeadlineConfig {
    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self { budget_ms: 8_000 }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Age in seconds after which an entry is refetched.
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

/// Watch mode configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Seconds between refresh ticks.
    pub interval_secs: u64,
}

impl WatchConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// One configured location.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationConfig {
    /// Stable identifier (e.g. a marker id).
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    /// Free-form category tag.
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    "general".to_string()
}

impl LocationConfig {
    pub fn to_location(&self) -> Location {
        Location::new(self.id.as_str(), self.lat, self.lon, self.category.as_str())
    }
}
