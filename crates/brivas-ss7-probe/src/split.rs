//! Fan-out of captured chunks by a routing or subscriber key
//!
//! Stream id and source port come straight from the chunk. Calling GT and
//! IMSI need a decoded frame; chunks that do not yield the key are not filed.

use crate::sctp::SctpChunk;
use crate::types::DecodedMessage;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

/// What chunks are grouped on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitKey {
    Stream,
    SourcePort,
    CallingGt,
    Imsi,
}

impl SplitKey {
    /// Whether the key can only be taken from a decoded frame
    pub fn needs_decode(&self) -> bool {
        matches!(self, Self::CallingGt | Self::Imsi)
    }

    /// Group key for one chunk, if it has one
    pub fn key_for(&self, chunk: &SctpChunk, decoded: Option<&DecodedMessage<'_>>) -> Option<String> {
        match self {
            Self::Stream => Some(chunk.stream_id.to_string()),
            Self::SourcePort => Some(chunk.source_port.to_string()),
            Self::CallingGt => decoded.and_then(|m| m.calling_gt_hex()),
            Self::Imsi => decoded.and_then(|m| m.imsi.clone()),
        }
    }

    /// Output group name, e.g. `imsi_250011234567890`
    pub fn group_name(&self, key: &str) -> String {
        format!("{}_{}", self, key)
    }
}

impl fmt::Display for SplitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stream => "stream",
            Self::SourcePort => "src_port",
            Self::CallingGt => "calling_gt",
            Self::Imsi => "imsi",
        };
        f.write_str(name)
    }
}

/// Single-owner splitter, threaded through the driver
#[derive(Debug, Clone)]
pub struct FrameSplitter {
    key: SplitKey,
    groups: BTreeMap<String, Vec<SctpChunk>>,
}

impl FrameSplitter {
    pub fn new(key: SplitKey) -> Self {
        Self {
            key,
            groups: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> SplitKey {
        self.key
    }

    /// File `chunk` under its key. Returns the key it was filed under.
    pub fn offer(&mut self, chunk: &SctpChunk, decoded: Option<&DecodedMessage<'_>>) -> Option<String> {
        let key = self.key.key_for(chunk, decoded)?;
        trace!(split = %self.key, %key, chunk = chunk.chunk_index, "chunk filed");
        self.groups
            .entry(key.clone())
            .or_default()
            .push(chunk.clone());
        Some(key)
    }

    pub fn groups(&self) -> &BTreeMap<String, Vec<SctpChunk>> {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in key order, paired with their output name
    pub fn into_groups(self) -> Vec<(String, Vec<SctpChunk>)> {
        let key = self.key;
        self.groups
            .into_iter()
            .map(|(k, chunks)| (key.group_name(&k), chunks))
            .collect()
    }
}

/// Splitter shared between decoding threads
#[derive(Debug)]
pub struct SharedSplitter {
    key: SplitKey,
    groups: DashMap<String, Vec<SctpChunk>>,
}

impl SharedSplitter {
    pub fn new(key: SplitKey) -> Self {
        Self {
            key,
            groups: DashMap::new(),
        }
    }

    pub fn offer(&self, chunk: &SctpChunk, decoded: Option<&DecodedMessage<'_>>) -> Option<String> {
        let key = self.key.key_for(chunk, decoded)?;
        self.groups.entry(key.clone()).or_default().push(chunk.clone());
        Some(key)
    }

    /// Collapse into a single-owner splitter. Chunks within a group are put
    /// back in capture order.
    pub fn into_splitter(self) -> FrameSplitter {
        let groups = self
            .groups
            .into_iter()
            .map(|(k, mut chunks)| {
                chunks.sort_by_key(|c| c.chunk_index);
                (k, chunks)
            })
            .collect();
        FrameSplitter {
            key: self.key,
            groups,
        }
    }
}
