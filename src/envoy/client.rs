//! Envoy HTTP client
//!
//! Fetches `production.json` from the Envoy and decodes it into readings.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::types::{InverterSummary, RawEnvoyDocument, Reading};
use crate::errors::EnvoyError;

/// Upper bound for one request to the device.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Log target of the per-reading lines, kept at INFO whatever the log level.
pub const READINGS_TARGET: &str = "envoy_readings";

/// Something that yields one production reading and the consumption readings.
#[async_trait]
pub trait ReadingSource {
    async fn poll(&self) -> Result<(Reading, Vec<Reading>), EnvoyError>;
}

pub struct EnvoyClient {
    url: String,
    client: reqwest::Client,
}

impl EnvoyClient {
    /// `host` is taken as-is, so "envoy", "10.0.0.7" or "10.0.0.7:8080".
    pub fn new(host: &str) -> Result<Self, EnvoyError> {
        let url = format!("http://{}/production.json?details=1", host);
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| EnvoyError::Network {
                url: url.clone(),
                source,
            })?;

        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<u8>, EnvoyError> {
        let network = |source| EnvoyError::Network {
            url: self.url.clone(),
            source,
        };

        let response = self.client.get(&self.url).send().await.map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnvoyError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.bytes().await.map_err(network)?;
        debug!("Received {} bytes from {}", body.len(), self.url);
        Ok(body.to_vec())
    }
}

#[async_trait]
impl ReadingSource for EnvoyClient {
    async fn poll(&self) -> Result<(Reading, Vec<Reading>), EnvoyError> {
        let body = self.fetch().await?;
        let (production, consumption) = decode_document(&body)?;

        info!(
            target: READINGS_TARGET,
            "{} {}: {:.3}",
            production.timestamp, production.kind, production.instantaneous_power
        );
        for reading in &consumption {
            info!(
                target: READINGS_TARGET,
                "{} {}: {:.3}",
                reading.timestamp, reading.kind, reading.instantaneous_power
            );
        }

        Ok((production, consumption))
    }
}

/// Decode a `production.json` body.
///
/// `production` is a positional pair `[inverters, eim]`; both halves must be
/// objects. Elements after the second are ignored. `storage` is never looked at.
pub fn decode_document(body: &[u8]) -> Result<(Reading, Vec<Reading>), EnvoyError> {
    let document: RawEnvoyDocument = serde_json::from_slice(body)?;

    let production = decode_production(document.production)?;
    let consumption: Vec<Reading> = serde_json::from_value(document.consumption)?;

    Ok((production, consumption))
}

fn decode_production(production: Value) -> Result<Reading, EnvoyError> {
    let mut elements = match production {
        Value::Array(elements) => elements.into_iter(),
        other => {
            return Err(EnvoyError::Decode(format!(
                "production: expected array, got {}",
                type_name(&other)
            )))
        }
    };

    let (inverters, eim) = match (elements.next(), elements.next()) {
        (Some(inverters), Some(eim)) => (inverters, eim),
        _ => {
            return Err(EnvoyError::Decode(
                "production: expected [inverters, eim], got fewer than 2 elements".to_string(),
            ))
        }
    };

    let inverters: InverterSummary =
        serde_json::from_value(expect_object("production[0]", inverters)?)?;
    debug!("Active inverters: {}", inverters.active_count);

    Ok(serde_json::from_value(expect_object("production[1]", eim)?)?)
}

fn expect_object(position: &str, value: Value) -> Result<Value, EnvoyError> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(EnvoyError::Decode(format!(
            "{}: expected object, got {}",
            position,
            type_name(&value)
        )))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
