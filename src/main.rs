use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use influx_envoy_stats::config::{Config, LogLevel};
use influx_envoy_stats::envoy::client::READINGS_TARGET;
use influx_envoy_stats::envoy::EnvoyClient;
use influx_envoy_stats::influx::{InfluxConnector, TimeSeriesWriter};
use influx_envoy_stats::scheduler::{Poller, Schedule};
use tokio::sync::watch;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.toml";

/// Envoy InfluxDB Bridge - Writes Enphase Envoy solar data to InfluxDB
#[derive(Parser)]
#[command(name = "influx-envoy-stats")]
#[command(version)]
#[command(about = "Envoy InfluxDB Bridge - Writes Enphase Envoy solar data to InfluxDB", long_about = None)]
struct Cli {
    /// Path to configuration file (defaults apply when omitted and config.toml is absent)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// IP or hostname of the Envoy, overrides envoy.host
    #[arg(short, long)]
    envoy: Option<String>,

    /// Poll interval, e.g. "30s"; "0s" polls once and exits. Overrides envoy.interval
    #[arg(short, long, value_parser = humantime::parse_duration)]
    interval: Option<Duration>,
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::from_file(DEFAULT_CONFIG)?,
        None => Config::default(),
    };

    if let Some(host) = &cli.envoy {
        config.envoy.host = host.clone();
    }
    if let Some(interval) = cli.interval {
        config.envoy.interval = interval;
    }
    config.validate()?;

    Ok(config)
}

/// Reading lines stay at INFO regardless of the configured level.
fn log_filter(level: LogLevel) -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive(format!("influx_envoy_stats={}", level.as_str()).parse()?)
        .add_directive(format!("{}=info", READINGS_TARGET).parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Initialize tracing with log level from config
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(config.default.log_level)?)
        .init();

    let schedule = Schedule::from_interval(config.envoy.interval);

    info!("Log level: {}", config.default.log_level);
    debug!("Debug logging is enabled");
    info!("  Envoy Host: {}", config.envoy.host);
    info!("  InfluxDB: {:?}", config.influxdb);
    info!("  Schedule: {:?}", schedule);

    let envoy = EnvoyClient::new(&config.envoy.host)?;
    let writer = TimeSeriesWriter::new(
        InfluxConnector::new(config.influxdb.clone()),
        config.influxdb.measurement.clone(),
    );
    let mut poller = Poller::new(envoy, writer);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    if let Schedule::Every(_) = schedule {
        ctrlc::set_handler(move || {
            let _ = shutdown_tx.send(true);
        })?;
        info!("Starting poll loop...");
    }

    let result = poller.run(schedule, shutdown_rx).await;

    let (_, writer) = poller.into_parts();
    writer.close();

    result?;
    Ok(())
}
