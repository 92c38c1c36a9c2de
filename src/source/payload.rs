//! Raw upstream payloads.
//!
//! Only the fields the engine reads are modelled; everything else in the
//! upstream JSON is ignored.

use serde::Deserialize;

/// Response from `GET /air_pollution`.
#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionResponse {
    #[serde(default)]
    pub list: Vec<AirPollutionSample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionSample {
    pub main: AirQualityIndex,
    #[serde(default)]
    pub components: Components,
}

/// External 1–5 category index.
#[derive(Debug, Clone, Deserialize)]
pub struct AirQualityIndex {
    pub aqi: u8,
}

/// Pollutant concentrations in µg/m³. Any of them may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub co: Option<f64>,
    #[serde(default)]
    pub no2: Option<f64>,
    #[serde(default)]
    pub o3: Option<f64>,
    #[serde(default)]
    pub so2: Option<f64>,
    #[serde(default)]
    pub pm2_5: Option<f64>,
    #[serde(default)]
    pub pm10: Option<f64>,
}

/// Response from `GET /weather?units=metric`.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherResponse {
    pub main: WeatherMain,
    pub wind: Wind,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherMain {
    pub temp: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherCondition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_components_decode() {
        let json = r#"{"list":[{"main":{"aqi":2},"components":{"pm10":4.1}}]}"#;
        let payload: AirPollutionResponse = serde_json::from_str(json).unwrap();
        let sample = &payload.list[0];
        assert_eq!(sample.main.aqi, 2);
        assert_eq!(sample.components.pm10, Some(4.1));
        assert!(sample.components.co.is_none());
    }

    #[test]
    fn test_weather_requires_main() {
        let json = r#"{"wind":{"speed":1.0}}"#;
        assert!(serde_json::from_str::<WeatherResponse>(json).is_err());
    }
}
