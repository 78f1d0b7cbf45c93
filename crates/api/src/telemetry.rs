//! Logging and metrics setup

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::ServerError;

pub const LOOKUPS_TOTAL: &str = "weather_lookups_total";
pub const LOOKUP_DURATION: &str = "weather_lookup_duration_seconds";

/// Initialize logging
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once is harmless.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        debug!("Tracing subscriber already installed");
    }
}

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))?;

    describe_counter!(LOOKUPS_TOTAL, "Weather lookups by result (hit, miss, error)");
    describe_histogram!(LOOKUP_DURATION, Unit::Seconds, "Weather store lookup latency");

    Ok(handle)
}
