// packages/engine/src/observability/mod.rs
//! Tracing and metrics setup
//!
//! Logs go to stderr so they never interleave with rendered frames on
//! stdout. Set `RUST_LOG` to adjust verbosity and `WATOR_LOG_FORMAT=json`
//! for structured output.

use crate::utils::errors::{EngineError, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log format
pub const LOG_FORMAT_ENV: &str = "WATOR_LOG_FORMAT";

/// Install the global tracing subscriber
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| EngineError::Observability(format!("tracing: {}", e)))
}

/// Install the Prometheus metrics recorder
///
/// No HTTP listener is started; the returned handle renders the exposition
/// text on demand.
pub fn init_metrics() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| EngineError::Observability(format!("metrics: {}", e)))
}
