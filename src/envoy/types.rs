//! Data types for Envoy responses
//!
//! Field names follow the `production.json` API of the Envoy firmware.

use serde::Deserialize;
use serde_json::Value;

/// One meter sample ("eim" entry) from the Envoy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Reading {
    #[serde(rename = "measurementType")]
    pub kind: String,
    #[serde(rename = "readingTime")]
    pub timestamp: i64, // epoch seconds, device clock
    #[serde(rename = "wNow")]
    pub instantaneous_power: f64, // W, may be negative

    #[serde(rename = "whLifetime")]
    pub wh_lifetime: f64,
    #[serde(rename = "varhLeadLifetime")]
    pub varh_lead_lifetime: f64,
    #[serde(rename = "varhLagLifetime")]
    pub varh_lag_lifetime: f64,
    #[serde(rename = "vahLifetime")]
    pub vah_lifetime: f64,
    #[serde(rename = "rmsCurrent")]
    pub rms_current: f64, // A
    #[serde(rename = "rmsVoltage")]
    pub rms_voltage: f64, // V
    #[serde(rename = "reactPwr")]
    pub reactive_power: f64, // var
    #[serde(rename = "apprntPwr")]
    pub apparent_power: f64, // VA
    #[serde(rename = "pwrFactor")]
    pub power_factor: f64,
    #[serde(rename = "whToday")]
    pub wh_today: f64,
    #[serde(rename = "whLastSevenDays")]
    pub wh_last_seven_days: f64,
    #[serde(rename = "vahToday")]
    pub vah_today: f64,
    #[serde(rename = "varhLeadToday")]
    pub varh_lead_today: f64,
    #[serde(rename = "varhLagToday")]
    pub varh_lag_today: f64,
}

/// First element of the `production` array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InverterSummary {
    #[serde(rename = "activeCount")]
    pub active_count: i64,
}

/// Top level of `production.json`, sections left undecoded
#[derive(Debug, Deserialize)]
pub struct RawEnvoyDocument {
    pub production: Value,
    pub consumption: Value,
    #[serde(default)]
    pub storage: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_maps_exact_keys() {
        let json = r#"{
            "type": "eim",
            "activeCount": 1,
            "measurementType": "net-consumption",
            "readingTime": 1700000123,
            "wNow": -412.25,
            "whLifetime": 123456.5,
            "varhLeadLifetime": 1.5,
            "varhLagLifetime": 2.5,
            "vahLifetime": 3.5,
            "rmsCurrent": 4.25,
            "rmsVoltage": 241.2,
            "reactPwr": 10.0,
            "apprntPwr": 620.0,
            "pwrFactor": -0.66,
            "whToday": 0.0,
            "whLastSevenDays": 0.0,
            "vahToday": 7.0,
            "varhLeadToday": 8.0,
            "varhLagToday": 9.0
        }"#;

        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.kind, "net-consumption");
        assert_eq!(reading.timestamp, 1700000123);
        assert_eq!(reading.instantaneous_power, -412.25);
        assert_eq!(reading.wh_lifetime, 123456.5);
        assert_eq!(reading.varh_lead_lifetime, 1.5);
        assert_eq!(reading.varh_lag_lifetime, 2.5);
        assert_eq!(reading.vah_lifetime, 3.5);
        assert_eq!(reading.rms_current, 4.25);
        assert_eq!(reading.rms_voltage, 241.2);
        assert_eq!(reading.reactive_power, 10.0);
        assert_eq!(reading.apparent_power, 620.0);
        assert_eq!(reading.power_factor, -0.66);
        assert_eq!(reading.vah_today, 7.0);
        assert_eq!(reading.varh_lead_today, 8.0);
        assert_eq!(reading.varh_lag_today, 9.0);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let reading: Reading = serde_json::from_str(r#"{"wNow": 5}"#).unwrap();
        assert_eq!(reading.kind, "");
        assert_eq!(reading.timestamp, 0);
        assert_eq!(reading.instantaneous_power, 5.0);
        assert_eq!(reading.wh_lifetime, 0.0);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let reading: Reading = serde_json::from_str(r#"{"WNow": 5, "MeasurementType": "x"}"#).unwrap();
        assert_eq!(reading, Reading::default());
    }

    #[test]
    fn test_type_mismatch_is_an_error() {
        assert!(serde_json::from_str::<Reading>(r#"{"wNow": "lots"}"#).is_err());
    }
}
