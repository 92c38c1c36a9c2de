//! Integration tests for the upstream client against a mock provider.

use aqi_engine::model::{AqiLevel, Coordinates};
use aqi_engine::source::{DataSource, Endpoint, OpenWeatherClient, SourceError};
use aqi_engine::config::SourceConfig;

mod common;
use common::{air_body, healthy, start_mock_upstream, weather_body, MockReply};

#[tokio::test]
async fn test_success_is_normalized() {
    let upstream = start_mock_upstream(|endpoint, query| {
        // Weather must be requested in metric units.
        if endpoint == "weather" && query.get("units").map(String::as_str) != Some("metric") {
            return MockReply::status(400);
        }
        healthy(endpoint, query)
    })
    .await;
    let client = OpenWeatherClient::new(&upstream.source_config()).unwrap();

    let reading = client.fetch(Coordinates::new(10.77, 106.7)).await.unwrap();

    assert_eq!(reading.aqi, 150);
    assert_eq!(reading.level, AqiLevel::Poor);
    assert_eq!(reading.level.label_vi(), "Kém");
    assert_eq!(reading.pollutants.pm2_5.to_string(), "12.34");
    assert_eq!(reading.temperature, 31.2);
    assert_eq!(reading.humidity, 70.0);
    assert_eq!(reading.conditions.unwrap().description, "scattered clouds");
    assert!((45.0..=75.0).contains(&reading.estimated_noise_db));
    assert_eq!(upstream.hits(), 2);
}

#[tokio::test]
async fn test_server_error_is_status_error() {
    let upstream = start_mock_upstream(|endpoint, _| match endpoint {
        "air_pollution" => MockReply::status(500),
        _ => MockReply::ok(weather_body()),
    })
    .await;
    let client = OpenWeatherClient::new(&upstream.source_config()).unwrap();

    let err = client.fetch(Coordinates::new(1.0, 1.0)).await.unwrap_err();
    assert!(matches!(
        err,
        SourceError::Status { endpoint: Endpoint::AirQuality, status: 500 }
    ));
}

#[tokio::test]
async fn test_wrong_key_is_rejected_upstream() {
    let upstream = start_mock_upstream(healthy).await;
    let config = SourceConfig {
        api_key: "wrong".to_string(),
        ..upstream.source_config()
    };
    let client = OpenWeatherClient::new(&config).unwrap();

    let err = client.fetch(Coordinates::new(1.0, 1.0)).await.unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 401, .. }));
}

#[tokio::test]
async fn test_malformed_body() {
    let upstream = start_mock_upstream(|endpoint, _| match endpoint {
        "air_pollution" => MockReply::ok(air_body(2)),
        _ => MockReply::ok("<html>maintenance</html>"),
    })
    .await;
    let client = OpenWeatherClient::new(&upstream.source_config()).unwrap();

    let err = client.fetch(Coordinates::new(1.0, 1.0)).await.unwrap_err();
    assert!(matches!(err, SourceError::Malformed { endpoint: Endpoint::Weather, .. }));
}

#[tokio::test]
async fn test_network_error_does_not_leak_key() {
    // Nothing listens on port 1.
    let config = SourceConfig {
        base_url: "http://127.0.0.1:1/data/2.5".to_string(),
        api_key: "super-secret".to_string(),
        ..SourceConfig::default()
    };
    let client = OpenWeatherClient::new(&config).unwrap();

    let err = client.fetch(Coordinates::new(1.0, 1.0)).await.unwrap_err();
    assert!(matches!(err, SourceError::Network { .. }));
    assert!(!err.to_string().contains("super-secret"));
}
