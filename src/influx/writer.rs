//! Time-series writer
//!
//! Owns the InfluxDB connection and writes one point per reading.

use async_trait::async_trait;
use tracing::{debug, info};

use super::point::Point;
use super::store::{Connect, PointStore};
use crate::envoy::Reading;
use crate::errors::WriteError;

/// Destination for the readings of one poll cycle.
#[async_trait]
pub trait ReadingSink {
    async fn write(
        &mut self,
        production: &Reading,
        consumption: &[Reading],
    ) -> Result<(), WriteError>;
}

/// Writes readings as points, connecting on first use and keeping the
/// connection for its whole lifetime.
pub struct TimeSeriesWriter<C: Connect> {
    connector: C,
    measurement: String,
    store: Option<C::Store>,
}

impl<C: Connect> TimeSeriesWriter<C> {
    pub fn new(connector: C, measurement: impl Into<String>) -> Self {
        Self {
            connector,
            measurement: measurement.into(),
            store: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    fn store(&mut self) -> Result<&mut C::Store, WriteError> {
        let store = match self.store.take() {
            Some(store) => store,
            None => {
                info!("Connecting to InfluxDB...");
                self.connector.connect()?
            }
        };
        Ok(self.store.insert(store))
    }

    /// Consumption readings first, production last. Stops at the first
    /// failed point; points already written stay written.
    pub async fn write(
        &mut self,
        production: &Reading,
        consumption: &[Reading],
    ) -> Result<(), WriteError> {
        let points = consumption
            .iter()
            .chain(std::iter::once(production))
            .map(|reading| Point::from_reading(&self.measurement, reading))
            .collect::<Result<Vec<_>, _>>()?;

        let store = self.store()?;
        for point in &points {
            store.write_point(point).await?;
        }

        debug!("Wrote {} points to '{}'", points.len(), self.measurement);
        Ok(())
    }

    /// Release the connection, if one was made.
    pub fn close(self) {
        if self.store.is_some() {
            info!("Closing InfluxDB connection");
        }
    }
}

#[async_trait]
impl<C> ReadingSink for TimeSeriesWriter<C>
where
    C: Connect,
{
    async fn write(
        &mut self,
        production: &Reading,
        consumption: &[Reading],
    ) -> Result<(), WriteError> {
        TimeSeriesWriter::write(self, production, consumption).await
    }
}
