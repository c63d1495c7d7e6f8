use chrono::{DateTime, Utc};
use influxdb2::models::DataPoint;

use crate::envoy::Reading;
use crate::errors::WriteError;

pub const TYPE_TAG: &str = "type";
pub const WATTS_FIELD: &str = "watts";

/// One time-series point, as stored for a single reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: String,
    pub kind: String, // tag "type"
    pub watts: f64,   // field "watts"
    pub time: DateTime<Utc>,
}

impl Point {
    /// Fails for times that cannot be sent at nanosecond precision
    /// (before 1677 or after 2262).
    pub fn from_reading(measurement: &str, reading: &Reading) -> Result<Self, WriteError> {
        let time = DateTime::from_timestamp(reading.timestamp, 0)
            .filter(|time| time.timestamp_nanos_opt().is_some())
            .ok_or_else(|| {
                WriteError::InvalidPoint(format!(
                    "reading time {} out of range for '{}'",
                    reading.timestamp, reading.kind
                ))
            })?;

        Ok(Self {
            measurement: measurement.to_string(),
            kind: reading.kind.clone(),
            watts: reading.instantaneous_power,
            time,
        })
    }

    /// Whole seconds since the epoch.
    pub fn timestamp(&self) -> i64 {
        self.time.timestamp()
    }

    pub fn to_data_point(&self) -> Result<DataPoint, WriteError> {
        // The v2 write API defaults to nanosecond precision.
        let timestamp = self
            .time
            .timestamp_nanos_opt()
            .ok_or_else(|| WriteError::InvalidPoint("Timestamp overflow".to_string()))?;

        DataPoint::builder(self.measurement.as_str())
            .tag(TYPE_TAG, self.kind.clone())
            .field(WATTS_FIELD, self.watts)
            .timestamp(timestamp)
            .build()
            .map_err(|e| WriteError::InvalidPoint(format!("Failed to build point: {}", e)))
    }
}
