//! Configuration module for the Envoy-InfluxDB bridge
//!
//! Loads configuration from a TOML file:
//! - [default] - General settings (log_level)
//! - [envoy] - Envoy device and polling settings
//! - [influxdb] - InfluxDB connection settings
//!
//! Every key has a default, so the file itself is optional.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Log level for the application
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to tracing LevelFilter string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub default: DefaultConfig,
    #[serde(default)]
    pub envoy: EnvoyConfig,
    #[serde(default)]
    pub influxdb: InfluxConfig,
}

/// General application settings
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DefaultConfig {
    /// Log level: TRACE, DEBUG, INFO, WARN, ERROR
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Envoy device configuration
#[derive(Debug, Deserialize, Clone)]
pub struct EnvoyConfig {
    /// Envoy hostname or IP address
    #[serde(default = "default_envoy_host")]
    pub host: String,

    /// Poll interval (e.g., "30s", "1m"); "0s" polls once and exits
    #[serde(default, with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for EnvoyConfig {
    fn default() -> Self {
        Self {
            host: default_envoy_host(),
            interval: Duration::ZERO,
        }
    }
}

fn default_envoy_host() -> String {
    "envoy".to_string()
}

/// InfluxDB connection configuration
#[derive(Deserialize, Clone)]
pub struct InfluxConfig {
    /// InfluxDB base URL
    #[serde(default = "default_influx_url")]
    pub url: String,

    /// Organization the bucket belongs to
    #[serde(default = "default_solar")]
    pub org: String,

    /// Bucket (or "database/retention" on InfluxDB 1.8)
    #[serde(default = "default_solar")]
    pub bucket: String,

    /// API token; when absent "username:password" is used
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Measurement name all readings are written to
    #[serde(default = "default_measurement")]
    pub measurement: String,
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            url: default_influx_url(),
            org: default_solar(),
            bucket: default_solar(),
            token: None,
            username: default_username(),
            password: default_password(),
            measurement: default_measurement(),
        }
    }
}

impl InfluxConfig {
    /// Token sent in the Authorization header.
    pub fn auth_token(&self) -> String {
        match &self.token {
            Some(token) => token.clone(),
            None => format!("{}:{}", self.username, self.password),
        }
    }
}

fn default_influx_url() -> String {
    "http://localhost:8086".to_string()
}

fn default_solar() -> String {
    "solar".to_string()
}

fn default_username() -> String {
    "user".to_string()
}

fn default_password() -> String {
    "pw".to_string()
}

fn default_measurement() -> String {
    "readings".to_string()
}

impl std::fmt::Debug for InfluxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("InfluxConfig")
            .field("url", &self.url)
            .field("org", &self.org)
            .field("bucket", &self.bucket)
            .field("token", &self.token.as_ref().map(|_| "***REDACTED***"))
            .field("username", &self.username)
            .field("password", &"***REDACTED***")
            .field("measurement", &self.measurement)
            .finish()
    }
}

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the config.toml file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration logic (semantic validation beyond type checks)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("envoy.host", &self.envoy.host),
            ("influxdb.url", &self.influxdb.url),
            ("influxdb.bucket", &self.influxdb.bucket),
            ("influxdb.measurement", &self.influxdb.measurement),
        ];

        for (key, value) in required {
            if value.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{} must not be empty",
                    key
                )));
            }
        }

        Ok(())
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.default.log_level, LogLevel::Info);
        assert_eq!(config.envoy.host, "envoy");
        assert_eq!(config.envoy.interval, Duration::ZERO);
        assert_eq!(config.influxdb.url, "http://localhost:8086");
        assert_eq!(config.influxdb.org, "solar");
        assert_eq!(config.influxdb.bucket, "solar");
        assert_eq!(config.influxdb.measurement, "readings");
        assert_eq!(config.influxdb.auth_token(), "user:pw");
    }

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
            [default]
            log_level = "DEBUG"

            [envoy]
            host = "192.168.1.50"
            interval = "30s"

            [influxdb]
            url = "http://influx:8086"
            org = "home"
            bucket = "energy"
            token = "secret-token"
            measurement = "envoy"
        "#;

        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.default.log_level, LogLevel::Debug);
        assert_eq!(config.envoy.host, "192.168.1.50");
        assert_eq!(config.envoy.interval, Duration::from_secs(30));
        assert_eq!(config.influxdb.bucket, "energy");
        assert_eq!(config.influxdb.auth_token(), "secret-token");
        assert_eq!(config.influxdb.measurement, "envoy");
    }

    #[test]
    fn test_empty_measurement_is_rejected() {
        let toml_str = r#"
            [influxdb]
            measurement = ""
        "#;

        let err = Config::from_toml(toml_str).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("influxdb.measurement"));
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
        assert_eq!(LogLevel::Trace.as_str(), "trace");
    }
}
