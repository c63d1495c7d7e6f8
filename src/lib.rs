//! Envoy to InfluxDB Bridge
//!
//! Polls the `production.json` endpoint of an Enphase Envoy and stores the
//! production and consumption readings in InfluxDB.

pub mod config;
pub mod envoy;
pub mod errors;
pub mod influx;
pub mod scheduler;

pub use config::Config;
pub use envoy::client::EnvoyClient;
pub use influx::writer::TimeSeriesWriter;
pub use scheduler::{Poller, Schedule};
