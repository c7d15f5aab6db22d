//! Error types for the SS7 probe

use std::fmt;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Top-level probe error
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Frame too large: {len} octets (max {max})")]
    FrameTooLarge { len: usize, max: usize },

    #[error("Channel closed")]
    ChannelClosed,
}

/// Protocol layer a decode error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    M3ua,
    Sccp,
    Tcap,
    Component,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::M3ua => "M3UA",
            Self::Sccp => "SCCP",
            Self::Tcap => "TCAP",
            Self::Component => "component",
        };
        f.write_str(name)
    }
}

/// Frame-local decode errors.
///
/// None of these ever escape the frame they were raised for: the driver
/// records the frame as undecodable and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Truncated input: read at offset {offset} exceeds frame bound {bound}")]
    TruncatedInput { offset: usize, bound: usize },

    #[error("Unrecognized {layer} tag {tag} at offset {offset}")]
    UnrecognizedTag { layer: Layer, tag: u32, offset: usize },

    #[error("Invalid {layer} length {length} at offset {offset}")]
    InvalidLength { layer: Layer, offset: usize, length: usize },
}

impl DecodeError {
    /// Whether decoding can stop at this layer and still report the fields
    /// decoded so far.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnrecognizedTag { .. })
    }
}
