//! Shared utilities for integration testing.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use aqi_engine::config::SourceConfig;

pub const API_KEY: &str = "test-key";

/// What the mock upstream answers for one request.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    #[allow(dead_code)]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Responder = dyn Fn(&str, &HashMap<String, String>) -> MockReply + Send + Sync;

#[derive(Clone)]
struct MockState {
    responder: Arc<Responder>,
    hits: Arc<AtomicUsize>,
}

/// A running mock of the `/air_pollution` + `/weather` provider.
pub struct MockUpstream {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockUpstream {
    /// Requests served so far, across both endpoints.
    #[allow(dead_code)]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            base_url: format!("http://{}/data/2.5", self.addr),
            api_key: API_KEY.to_string(),
            ..SourceConfig::default()
        }
    }
}

/// Start a programmable upstream. `responder` gets the endpoint name and the
/// query parameters. Requests without the test API key get a 401.
pub async fn start_mock_upstream<F>(responder: F) -> MockUpstream
where
    F: Fn(&str, &HashMap<String, String>) -> MockReply + Send + Sync + 'static,
{
    let hits = Arc::new(AtomicUsize::new(0));
    let state = MockState {
        responder: Arc::new(responder),
        hits: hits.clone(),
    };

    let app = Router::new()
        .route("/data/2.5/air_pollution", get(air_pollution))
        .route("/data/2.5/weather", get(weather))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream { addr, hits }
}

async fn air_pollution(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    respond(&state, "air_pollution", &query).await
}

async fn weather(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    respond(&state, "weather", &query).await
}

async fn respond(
    state: &MockState,
    endpoint: &str,
    query: &HashMap<String, String>,
) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if query.get("appid").map(String::as_str) != Some(API_KEY) {
        return (StatusCode::UNAUTHORIZED, "invalid api key".to_string());
    }

    let reply = (state.responder)(endpoint, query);
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, reply.body)
}

/// Latitude sent with a request, as the mock saw it.
#[allow(dead_code)]
pub fn lat(query: &HashMap<String, String>) -> f64 {
    query.get("lat").and_then(|v| v.parse().ok()).unwrap_or(0.0)
}

#[allow(dead_code)]
/// A one-sample air-quality payload on the external 1-5 scale.
pub fn air_body(aqi: u8) -> String {
    format!(
        r#"{{"coord":{{"lon":106.7,"lat":10.77}},"list":[{{"main":{{"aqi":{aqi}}},"components":{{
            "co":270.37,"no":0.1,"no2":9.6,"o3":41.13,"so2":5.2,
            "pm2_5":12.34,"pm10":18.9,"nh3":1.2}},"dt":1700000000}}]}}"#
    )
}

#[allow(dead_code)]
pub fn weather_body() -> String {
    r#"{
        "weather": [{"id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d"}],
        "main": {"temp": 31.2, "feels_like": 36.0, "humidity": 70, "pressure": 1009},
        "wind": {"speed": 3.6, "deg": 150},
        "name": "Ho Chi Minh City"
    }"#
    .to_string()
}

/// Healthy answers for both endpoints.
#[allow(dead_code)]
pub fn healthy(endpoint: &str, _query: &HashMap<String, String>) -> MockReply {
    match endpoint {
        "air_pollution" => MockReply::ok(air_body(3)),
        _ => MockReply::ok(weather_body()),
    }
}
