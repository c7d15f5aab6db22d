//! Tracing setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::TelemetryConfig;
use crate::errors::{ProbeError, Result};

/// Metric names emitted by the driver
pub mod metric {
    pub const FRAMES_SEEN: &str = "ss7_probe_frames_seen_total";
    pub const FRAMES_DECODED: &str = "ss7_probe_frames_decoded_total";
    pub const FRAMES_FAILED: &str = "ss7_probe_frames_failed_total";
    pub const FRAMES_SKIPPED: &str = "ss7_probe_frames_skipped_total";
    pub const FRAMES_TOO_LARGE: &str = "ss7_probe_frames_too_large_total";
}

/// Install the global subscriber. `RUST_LOG` overrides `log_level`; exactly
/// one of the plain and JSON fmt layers is active.
pub fn init_tracing(config: &TelemetryConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| ProbeError::Config(format!("log_level {}: {}", config.log_level, e)))?;

    let json = config
        .json_logs
        .then(|| fmt::layer().json().with_thread_ids(true));
    let plain = (!config.json_logs).then(|| fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .try_init()
        .map_err(|e| ProbeError::Config(format!("subscriber already installed: {}", e)))?;

    tracing::debug!(
        probe_version = crate::VERSION,
        filter = %config.log_level,
        json = config.json_logs,
        "probe logging ready"
    );
    Ok(())
}
