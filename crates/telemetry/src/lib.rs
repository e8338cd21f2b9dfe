//! Logging bootstrap for the catalog service and its command-line client.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context};
use catalog_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

fn env_filter(default: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .with_context(|| format!("invalid log filter '{default}'"))
}

/// Install the stdout subscriber used by the HTTP service.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(&settings.filter)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    tracing::debug!(target: "catalog-telemetry", format = ?settings.log_format, "telemetry ready");
    Ok(())
}

/// Install a subscriber that appends plain log lines to `path`.
pub fn init_file(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info")?)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
