//! Mapping raw payloads into a `Reading`.

use chrono::{DateTime, Utc};

use crate::model::{AqiLevel, Concentration, Conditions, Pollutants, Reading};
use crate::source::payload::{AirPollutionResponse, Components, WeatherResponse};
use crate::source::types::{Endpoint, SourceError, SourceResult};

/// Range of the synthetic noise estimate in dB.
pub const NOISE_RANGE_DB: std::ops::Range<f64> = 45.0..75.0;

/// Rescale the external 1–5 category onto the local 0–500 scale.
pub fn rescale_aqi(index: u8) -> Option<u16> {
    match index {
        1 => Some(50),
        2 => Some(100),
        3 => Some(150),
        4 => Some(200),
        5 => Some(300),
        _ => None,
    }
}

/// Placeholder noise value. There is no noise sensor behind it.
pub fn synthetic_noise_db() -> f64 {
    let span = NOISE_RANGE_DB.end - NOISE_RANGE_DB.start;
    let raw = NOISE_RANGE_DB.start + fastrand::f64() * span;
    (raw * 10.0).round() / 10.0
}

fn pollutants(components: &Components) -> Pollutants {
    Pollutants {
        co: Concentration::new(components.co),
        no2: Concentration::new(components.no2),
        o3: Concentration::new(components.o3),
        so2: Concentration::new(components.so2),
        pm2_5: Concentration::new(components.pm2_5),
        pm10: Concentration::new(components.pm10),
    }
}

/// Combine both payloads into a normalized reading.
pub fn normalize(
    air: &AirPollutionResponse,
    weather: &WeatherResponse,
    noise_db: f64,
    now: DateTime<Utc>,
) -> SourceResult<Reading> {
    let sample = air.list.first().ok_or_else(|| SourceError::Malformed {
        endpoint: Endpoint::AirQuality,
        reason: "empty list".to_string(),
    })?;

    let aqi = rescale_aqi(sample.main.aqi).ok_or_else(|| SourceError::Malformed {
        endpoint: Endpoint::AirQuality,
        reason: format!("aqi index {} outside 1-5", sample.main.aqi),
    })?;

    let conditions = weather.weather.first().map(|c| Conditions {
        description: c.description.clone(),
        icon: c.icon.clone(),
    });

    Ok(Reading {
        aqi,
        level: AqiLevel::from_aqi(aqi),
        pollutants: pollutants(&sample.components),
        temperature: weather.main.temp,
        humidity: weather.main.humidity,
        pressure: weather.main.pressure,
        wind_speed: weather.wind.speed,
        conditions,
        estimated_noise_db: noise_db,
        acquired_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather() -> WeatherResponse {
        serde_json::from_str(
            r#"{
                "main": {"temp": 31.2, "humidity": 70, "pressure": 1009},
                "wind": {"speed": 3.6},
                "weather": [{"description": "scattered clouds", "icon": "03d"}]
            }"#,
        )
        .unwrap()
    }

    fn air(aqi: u8) -> AirPollutionResponse {
        serde_json::from_str(&format!(
            r#"{{"list":[{{"main":{{"aqi":{aqi}}},"components":{{
                "co": 270.37, "no2": 9.6, "o3": 41.13, "so2": 5.2,
                "pm2_5": 12.34, "pm10": 18.901
            }}}}]}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_rescale_table() {
        assert_eq!(rescale_aqi(1), Some(50));
        assert_eq!(rescale_aqi(2), Some(100));
        assert_eq!(rescale_aqi(3), Some(150));
        assert_eq!(rescale_aqi(4), Some(200));
        assert_eq!(rescale_aqi(5), Some(300));
        assert_eq!(rescale_aqi(0), None);
        assert_eq!(rescale_aqi(6), None);
    }

    #[test]
    fn test_moderate_index_maps_to_poor_bucket() {
        let now = Utc::now();
        let reading = normalize(&air(3), &weather(), 55.0, now).unwrap();

        assert_eq!(reading.aqi, 150);
        assert_eq!(reading.level, AqiLevel::Poor);
        assert_eq!(reading.level.label_vi(), "Kém");
        assert_eq!(reading.pollutants.pm2_5.to_string(), "12.34");
        assert_eq!(reading.pollutants.pm10.to_string(), "18.90");
        assert_eq!(reading.temperature, 31.2);
        assert_eq!(reading.humidity, 70.0);
        assert_eq!(reading.wind_speed, 3.6);
        assert_eq!(reading.conditions.as_ref().unwrap().icon, "03d");
        assert_eq!(reading.acquired_at, now);
    }

    #[test]
    fn test_missing_components_are_unavailable() {
        let air: AirPollutionResponse =
            serde_json::from_str(r#"{"list":[{"main":{"aqi":1}}]}"#).unwrap();
        let reading = normalize(&air, &weather(), 50.0, Utc::now()).unwrap();
        assert_eq!(reading.aqi, 50);
        assert_eq!(reading.level, AqiLevel::Good);
        assert_eq!(reading.pollutants.so2.to_string(), "N/A");
        assert!(!reading.pollutants.pm2_5.is_available());
    }

    #[test]
    fn test_empty_list_is_malformed() {
        let air: AirPollutionResponse = serde_json::from_str(r#"{"list":[]}"#).unwrap();
        let err = normalize(&air, &weather(), 50.0, Utc::now()).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { endpoint: Endpoint::AirQuality, .. }));
    }

    #[test]
    fn test_out_of_range_index_is_malformed() {
        let err = normalize(&air(9), &weather(), 50.0, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("outside 1-5"));
    }

    #[test]
    fn test_synthetic_noise_in_range() {
        for _ in 0..100 {
            let db = synthetic_noise_db();
            assert!((45.0..=75.0).contains(&db));
        }
    }
}
