//! Error types for the Envoy-InfluxDB bridge
//!
//! Uses thiserror for ergonomic error definitions.
//! These errors can be converted to anyhow::Error in the main application.

/// Envoy connection and decoding errors
#[derive(Debug, thiserror::Error)]
pub enum EnvoyError {
    #[error("Failed to reach Envoy at {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Envoy at {url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode Envoy response: {0}")]
    Decode(String),
}

impl EnvoyError {
    pub fn is_network(&self) -> bool {
        matches!(self, EnvoyError::Network { .. } | EnvoyError::Status { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, EnvoyError::Decode(_))
    }
}

impl From<serde_json::Error> for EnvoyError {
    fn from(error: serde_json::Error) -> Self {
        EnvoyError::Decode(error.to_string())
    }
}

/// InfluxDB connection and write errors
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Failed to connect to InfluxDB at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("Failed to build point: {0}")]
    InvalidPoint(String),

    #[error("InfluxDB rejected point for '{measurement}': {reason}")]
    Rejected { measurement: String, reason: String },
}

/// Error of one poll/write cycle
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    Envoy(#[from] EnvoyError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
