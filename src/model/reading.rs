//! Normalized environmental snapshot for one location.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-readable AQI bucket on the local 0–500 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiLevel {
    Good,
    Moderate,
    Poor,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
    /// No data; only used by the default reading.
    Unavailable,
}

impl AqiLevel {
    /// Bucket a local-scale AQI value.
    ///
    /// Breakpoints are inclusive upper bounds: 50, 100, 150, 200, 300.
    pub fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::Poor,
            151..=200 => AqiLevel::Unhealthy,
            201..=300 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::Unhealthy => "Unhealthy",
            AqiLevel::VeryUnhealthy => "Very Unhealthy",
            AqiLevel::Hazardous => "Hazardous",
            AqiLevel::Unavailable => "N/A",
        }
    }

    /// Label shown by the Vietnamese-language UI.
    pub fn label_vi(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Tốt",
            AqiLevel::Moderate => "Trung bình",
            AqiLevel::Poor => "Kém",
            AqiLevel::Unhealthy => "Xấu",
            AqiLevel::VeryUnhealthy => "Rất xấu",
            AqiLevel::Hazardous => "Nguy hại",
            AqiLevel::Unavailable => "N/A",
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pollutant concentration in µg/m³, rounded to 2 decimals, or unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Concentration(Option<f64>);

impl Concentration {
    pub fn new(value: Option<f64>) -> Self {
        Self(value.filter(|v| v.is_finite()).map(round2))
    }

    pub fn unavailable() -> Self {
        Self(None)
    }

    pub fn value(&self) -> Option<f64> {
        self.0
    }

    pub fn is_available(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Display for Concentration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.2}", v),
            None => f.write_str("N/A"),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The six pollutants reported by the air-quality endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pollutants {
    pub co: Concentration,
    pub no2: Concentration,
    pub o3: Concentration,
    pub so2: Concentration,
    pub pm2_5: Concentration,
    pub pm10: Concentration,
}

impl Pollutants {
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// Sky conditions from the weather endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub description: String,
    pub icon: String,
}

/// One location's environmental snapshot at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// AQI on the local 0–500 scale; 0 when unavailable.
    pub aqi: u16,
    pub level: AqiLevel,
    pub pollutants: Pollutants,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Percent.
    pub humidity: f64,
    /// hPa.
    pub pressure: f64,
    /// m/s.
    pub wind_speed: f64,
    pub conditions: Option<Conditions>,
    /// Synthetic placeholder, not a sensor value. Carries no accuracy contract.
    pub estimated_noise_db: f64,
    pub acquired_at: DateTime<Utc>,
}

impl Reading {
    /// Stand-in for a location whose fetch failed or timed out.
    ///
    /// Returned to callers transiently; never cached.
    pub fn unavailable(now: DateTime<Utc>) -> Self {
        Self {
            aqi: 0,
            level: AqiLevel::Unavailable,
            pollutants: Pollutants::unavailable(),
            temperature: 0.0,
            humidity: 0.0,
            pressure: 0.0,
            wind_speed: 0.0,
            conditions: None,
            estimated_noise_db: 0.0,
            acquired_at: now,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.level == AqiLevel::Unavailable
    }
}
