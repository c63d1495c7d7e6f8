//! InfluxDB storage backend
//!
//! `Connect` builds the long-lived client, `PointStore` persists single points.

use async_trait::async_trait;
use futures::stream;
use tracing::debug;

use super::point::Point;
use crate::config::InfluxConfig;
use crate::errors::WriteError;

#[async_trait]
pub trait PointStore: Send + Sync {
    async fn write_point(&self, point: &Point) -> Result<(), WriteError>;
}

/// Factory for a `PointStore`, invoked once per writer.
pub trait Connect: Send {
    type Store: PointStore;

    fn connect(&self) -> Result<Self::Store, WriteError>;
}

pub struct InfluxConnector {
    config: InfluxConfig,
}

impl InfluxConnector {
    pub fn new(config: InfluxConfig) -> Self {
        Self { config }
    }
}

impl Connect for InfluxConnector {
    type Store = InfluxStore;

    fn connect(&self) -> Result<InfluxStore, WriteError> {
        reqwest::Url::parse(&self.config.url).map_err(|e| WriteError::Connect {
            url: self.config.url.clone(),
            reason: e.to_string(),
        })?;

        let client = influxdb2::Client::new(
            self.config.url.as_str(),
            self.config.org.as_str(),
            self.config.auth_token(),
        );

        Ok(InfluxStore {
            client,
            bucket: self.config.bucket.clone(),
        })
    }
}

pub struct InfluxStore {
    client: influxdb2::Client,
    bucket: String,
}

#[async_trait]
impl PointStore for InfluxStore {
    async fn write_point(&self, point: &Point) -> Result<(), WriteError> {
        let data_point = point.to_data_point()?;

        self.client
            .write(&self.bucket, stream::iter(vec![data_point]))
            .await
            .map_err(|e| WriteError::Rejected {
                measurement: point.measurement.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            "Wrote {}/{} type={} watts={}",
            self.bucket, point.measurement, point.kind, point.watts
        );
        Ok(())
    }
}
