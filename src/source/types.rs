//! Source error definitions.

use thiserror::Error;

/// Which upstream call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    AirQuality,
    Weather,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::AirQuality => f.write_str("air_pollution"),
            Endpoint::Weather => f.write_str("weather"),
        }
    }
}

/// Errors raised by a data source for one coordinate.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Upstream answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },

    /// Connection, TLS or body transfer failed.
    #[error("{endpoint} request failed: {reason}")]
    Network { endpoint: Endpoint, reason: String },

    /// Body was not the payload we expect.
    #[error("{endpoint} payload malformed: {reason}")]
    Malformed { endpoint: Endpoint, reason: String },
}

impl SourceError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            SourceError::Status { endpoint, .. }
            | SourceError::Network { endpoint, .. }
            | SourceError::Malformed { endpoint, .. } => *endpoint,
        }
    }
}

/// Errors raised while constructing a source client.
#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("invalid base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::Status {
            endpoint: Endpoint::Weather,
            status: 503,
        };
        assert_eq!(err.to_string(), "weather returned HTTP 503");

        let err = SourceError::Malformed {
            endpoint: Endpoint::AirQuality,
            reason: "empty list".to_string(),
        };
        assert!(err.to_string().contains("air_pollution"));
        assert_eq!(err.endpoint(), Endpoint::AirQuality);
    }
}
