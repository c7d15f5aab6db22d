//! # Brivas SS7 Probe
//!
//! Passive decoder for SS7 signalling carried over SIGTRAN. Each SCTP DATA
//! chunk is walked through its layers and reduced to one flat row:
//!
//! - **M3UA** - common header, Payload Data parameter walk
//! - **SCCP** - Called/Calling Party Global Titles
//! - **TCAP** - Begin/End/Continue/Abort, Dialogue and Component Portions
//! - **MAP** - operation code, IMSI, MSC and VLR numbers
//!
//! Frames are decoded independently and never mutated; a frame that cannot
//! be decoded never affects the next one.
//!
//! ## Example
//! ```rust,ignore
//! use brivas_ss7_probe::{ChannelSource, MemorySink, Probe, ProbeConfig};
//!
//! let config = ProbeConfig::load(None)?;
//! let probe = Probe::new(config);
//! let (tx, mut source) = ChannelSource::channel(probe.config().demux.channel_capacity);
//! // capture side: tx.send(chunk).await?
//! let mut sink = MemorySink::default();
//! let report = probe.run(&mut source, &mut sink, probe.splitter()).await?;
//! ```

pub mod config;
pub mod cursor;
pub mod decoder;
pub mod errors;
pub mod m3ua;
pub mod map;
pub mod pipeline;
pub mod sccp;
pub mod sctp;
pub mod split;
pub mod tcap;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use config::{DemuxConfig, ProbeConfig, SplitConfig, TelemetryConfig};
pub use decoder::{decode_addressing, decode_m3ua};
pub use errors::{DecodeError, Layer, ProbeError, Result};
pub use types::{DecodedMessage, DecodedRecord, RECORD_COLUMNS};

pub use pipeline::{
    ChannelSource, ChunkOutcome, ChunkSource, FrameFailure, MemorySink, Probe, ProbeReport,
    ProbeStats, RecordSink,
};
pub use sctp::{SctpChunk, PPID_M3UA};
pub use split::{FrameSplitter, SharedSplitter, SplitKey};
pub use tcap::{ComponentType, Length, OperationCode, TcapMessageType};
pub use telemetry::init_tracing;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
