//! Probe configuration

use crate::errors::{ProbeError, Result};
use crate::sctp::PPID_M3UA;
use crate::split::SplitKey;
use serde::{Deserialize, Serialize};

/// Environment prefix, e.g. `SS7_PROBE__DEMUX__MAX_FRAME_LEN`
pub const ENV_PREFIX: &str = "SS7_PROBE";

/// Complete probe configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Frame intake
    pub demux: DemuxConfig,
    /// Fan-out of chunks by key (optional)
    pub split: Option<SplitConfig>,
    /// Logging
    pub telemetry: TelemetryConfig,
}

/// Frame intake configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemuxConfig {
    /// Payload Protocol Identifier accepted for decoding
    pub payload_protocol_id: u32,
    /// Largest chunk payload handed to the decoder
    pub max_frame_len: usize,
    /// Bound of the chunk channel feeding the driver
    pub channel_capacity: usize,
}

/// Chunk fan-out configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub key: SplitKey,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// JSON log lines instead of plain text
    pub json_logs: bool,
}

impl Default for DemuxConfig {
    fn default() -> Self {
        Self {
            payload_protocol_id: PPID_M3UA,
            max_frame_len: 65535,
            channel_capacity: 1024,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl ProbeConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProbeError::Config(format!("{}: {}", path, e)))?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON document
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer defaults, an optional file and `SS7_PROBE__*` environment
    /// variables, later sources winning.
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&str>, prefix: &str) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }
        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.demux.max_frame_len < crate::m3ua::HEADER_LEN {
            return Err(ProbeError::Config(format!(
                "max_frame_len {} is shorter than an M3UA header",
                self.demux.max_frame_len
            )));
        }
        if self.demux.channel_capacity == 0 {
            return Err(ProbeError::Config("channel_capacity must be non-zero".into()));
        }
        Ok(())
    }
}
