//! Envoy client module
//!
//! Reads the `production.json` endpoint of an Enphase Envoy gateway.

pub mod client;
pub mod types;

pub use client::{decode_document, EnvoyClient, ReadingSource};
pub use types::*;
