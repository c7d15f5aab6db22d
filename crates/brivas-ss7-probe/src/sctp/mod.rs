//! SCTP DATA chunks handed over by the capture side
//!
//! Packet capture and SCTP reassembly live outside the probe. They deliver
//! one [`SctpChunk`] per DATA chunk payload.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// SCTP Payload Protocol Identifier for M3UA
pub const PPID_M3UA: u32 = 3;

/// One reassembled SCTP DATA chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SctpChunk {
    /// Capture timestamp of the carrying packet
    pub timestamp: DateTime<Utc>,
    /// 1-based index of the carrying packet in the capture
    pub packet_index: u64,
    /// 1-based running index of DATA chunks in the capture
    pub chunk_index: u64,
    pub stream_id: u16,
    pub source_port: u16,
    pub destination_port: u16,
    /// Payload Protocol Identifier
    pub ppid: u32,
    /// Chunk user data, never mutated by the probe
    pub payload: Bytes,
}

impl SctpChunk {
    /// Chunk with the given payload and routing fields zeroed
    pub fn new(ppid: u32, payload: impl Into<Bytes>) -> Self {
        Self {
            timestamp: Utc::now(),
            packet_index: 0,
            chunk_index: 0,
            stream_id: 0,
            source_port: 0,
            destination_port: 0,
            ppid,
            payload: payload.into(),
        }
    }

    pub fn is_m3ua(&self) -> bool {
        self.ppid == PPID_M3UA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ppid_check() {
        assert!(SctpChunk::new(PPID_M3UA, vec![1u8]).is_m3ua());
        assert!(!SctpChunk::new(46, vec![1u8]).is_m3ua());
    }
}
