//! Upstream HTTP client for air-quality and weather readings.
//!
//! # Responsibilities
//! - Issue the air-quality and weather calls for one coordinate
//! - Reject non-2xx statuses and undecodable bodies
//! - Hand the decoded payloads to `normalize`

use chrono::Utc;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use url::Url;

use crate::config::SourceConfig;
use crate::model::{Coordinates, Reading};
use crate::source::normalize::{normalize, synthetic_noise_db};
use crate::source::payload::{AirPollutionResponse, WeatherResponse};
use crate::source::types::{ClientInitError, Endpoint, SourceError, SourceResult};

/// Anything that can produce a reading for one coordinate.
///
/// Implementations must not mutate shared engine state. Dropping the
/// returned future abandons the call.
pub trait DataSource: Send + Sync + 'static {
    fn fetch(&self, coords: Coordinates) -> impl Future<Output = SourceResult<Reading>> + Send;
}

/// OpenWeather-compatible client (`/air_pollution` + `/weather`).
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    air_quality_url: Url,
    weather_url: Url,
    api_key: String,
}

impl OpenWeatherClient {
    /// Build a client from configuration.
    pub fn new(config: &SourceConfig) -> Result<Self, ClientInitError> {
        let base = endpoint_base(&config.base_url)?;
        let air_quality_url = join(&base, "air_pollution")?;
        let weather_url = join(&base, "weather")?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        tracing::debug!(
            air_quality_url = %air_quality_url,
            weather_url = %weather_url,
            "OpenWeather client initialized"
        );

        Ok(Self {
            client,
            air_quality_url,
            weather_url,
            api_key: config.api_key.clone(),
        })
    }

    async fn air_quality(&self, coords: Coordinates) -> SourceResult<AirPollutionResponse> {
        let query = [
            ("lat", coords.lat.to_string()),
            ("lon", coords.lon.to_string()),
            ("appid", self.api_key.clone()),
        ];
        self.get_json(Endpoint::AirQuality, &self.air_quality_url, &query)
            .await
    }

    async fn weather(&self, coords: Coordinates) -> SourceResult<WeatherResponse> {
        let query = [
            ("lat", coords.lat.to_string()),
            ("lon", coords.lon.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ];
        self.get_json(Endpoint::Weather, &self.weather_url, &query)
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: &Url,
        query: &[(&str, String)],
    ) -> SourceResult<T> {
        // without_url(): the query string carries the API key.
        let network = |e: reqwest::Error| SourceError::Network {
            endpoint,
            reason: e.without_url().to_string(),
        };

        let resp = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(network)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(network)?;
        serde_json::from_slice(&body).map_err(|e| SourceError::Malformed {
            endpoint,
            reason: e.to_string(),
        })
    }
}

impl DataSource for OpenWeatherClient {
    fn fetch(&self, coords: Coordinates) -> impl Future<Output = SourceResult<Reading>> + Send {
        async move {
            let (air, weather) = tokio::try_join!(self.air_quality(coords), self.weather(coords))?;
            normalize(&air, &weather, synthetic_noise_db(), Utc::now())
        }
    }
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("air_quality_url", &self.air_quality_url.as_str())
            .field("weather_url", &self.weather_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn endpoint_base(raw: &str) -> Result<Url, ClientInitError> {
    // Url::join replaces the last segment unless the base ends with '/'.
    let normalized = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalized).map_err(|source| ClientInitError::BaseUrl {
        url: raw.to_string(),
        source,
    })
}

fn join(base: &Url, path: &str) -> Result<Url, ClientInitError> {
    base.join(path).map_err(|source| ClientInitError::BaseUrl {
        url: base.to_string(),
        source,
    })
}
