//! InfluxDB writer module
//!
//! Turns readings into points tagged by measurement type and stores them.

pub mod point;
pub mod store;
pub mod writer;

pub use point::Point;
pub use store::{Connect, InfluxConnector, InfluxStore, PointStore};
pub use writer::{ReadingSink, TimeSeriesWriter};
