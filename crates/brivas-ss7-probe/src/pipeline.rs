//! Driver between the capture side and the record writer
//!
//! A [`ChunkSource`] yields SCTP DATA chunks, the [`Probe`] decodes each one
//! independently and hands rows to a [`RecordSink`]. A frame that fails to
//! decode is recorded and the run moves on to the next.

use crate::config::ProbeConfig;
use crate::decoder::{decode_addressing, decode_m3ua};
use crate::errors::{ProbeError, Result};
use crate::sctp::SctpChunk;
use crate::split::FrameSplitter;
use crate::telemetry::metric;
use crate::types::DecodedRecord;
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

/// Producer of reassembled SCTP DATA chunks
#[async_trait]
pub trait ChunkSource: Send {
    /// Next chunk, or `None` once the capture is exhausted
    async fn next_chunk(&mut self) -> Option<SctpChunk>;
}

/// Consumer of decoded rows
#[async_trait]
pub trait RecordSink: Send {
    async fn write(&mut self, record: DecodedRecord) -> Result<()>;
}

/// Chunk source fed through a bounded tokio channel
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<SctpChunk>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<SctpChunk>) -> Self {
        Self { rx }
    }

    /// Sender half and source over a channel of `capacity` chunks
    pub fn channel(capacity: usize) -> (mpsc::Sender<SctpChunk>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl ChunkSource for ChannelSource {
    async fn next_chunk(&mut self) -> Option<SctpChunk> {
        self.rx.recv().await
    }
}

/// Sink collecting rows in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<DecodedRecord>,
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn write(&mut self, record: DecodedRecord) -> Result<()> {
        self.records.push(record);
        Ok(())
    }
}

/// A frame that could not be decoded
#[derive(Debug)]
pub struct FrameFailure {
    pub packet_index: u64,
    pub chunk_index: u64,
    pub error: ProbeError,
}

/// Result of handling one chunk
#[derive(Debug)]
pub enum ChunkOutcome {
    Decoded(DecodedRecord),
    /// Payload protocol other than the configured one
    Skipped,
    Failed(FrameFailure),
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProbeStats {
    pub seen: u64,
    pub decoded: u64,
    pub failed: u64,
    pub skipped: u64,
    pub too_large: u64,
}

impl ProbeStats {
    fn record(&mut self, outcome: &ChunkOutcome) {
        self.seen += 1;
        metrics::counter!(metric::FRAMES_SEEN).increment(1);
        match outcome {
            ChunkOutcome::Decoded(_) => {
                self.decoded += 1;
                metrics::counter!(metric::FRAMES_DECODED).increment(1);
            }
            ChunkOutcome::Skipped => {
                self.skipped += 1;
                metrics::counter!(metric::FRAMES_SKIPPED).increment(1);
            }
            ChunkOutcome::Failed(failure) => {
                self.failed += 1;
                metrics::counter!(metric::FRAMES_FAILED).increment(1);
                if matches!(failure.error, ProbeError::FrameTooLarge { .. }) {
                    self.too_large += 1;
                    metrics::counter!(metric::FRAMES_TOO_LARGE).increment(1);
                }
            }
        }
    }
}

/// Everything a run produced besides the rows themselves
#[derive(Debug)]
pub struct ProbeReport {
    pub stats: ProbeStats,
    pub failures: Vec<FrameFailure>,
    pub splitter: Option<FrameSplitter>,
}

/// Frame decoder configured for one capture
#[derive(Debug, Clone, Default)]
pub struct Probe {
    config: ProbeConfig,
}

impl Probe {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Empty splitter for the configured key, if splitting is enabled
    pub fn splitter(&self) -> Option<FrameSplitter> {
        self.config.split.map(|split| FrameSplitter::new(split.key))
    }

    /// Decode one chunk
    pub fn process(&self, chunk: &SctpChunk) -> ChunkOutcome {
        self.handle(chunk, None)
    }

    fn handle(&self, chunk: &SctpChunk, splitter: Option<&mut FrameSplitter>) -> ChunkOutcome {
        let demux = &self.config.demux;
        let failure = |error: ProbeError| {
            warn!(
                packet = chunk.packet_index,
                chunk = chunk.chunk_index,
                error = %error,
                "undecodable frame"
            );
            ChunkOutcome::Failed(FrameFailure {
                packet_index: chunk.packet_index,
                chunk_index: chunk.chunk_index,
                error,
            })
        };

        if chunk.ppid != demux.payload_protocol_id {
            if let Some(splitter) = splitter {
                splitter.offer(chunk, None);
            }
            return ChunkOutcome::Skipped;
        }

        if chunk.payload.len() > demux.max_frame_len {
            if let Some(splitter) = splitter {
                splitter.offer(chunk, None);
            }
            return failure(ProbeError::FrameTooLarge {
                len: chunk.payload.len(),
                max: demux.max_frame_len,
            });
        }

        match decode_m3ua(&chunk.payload) {
            Ok(msg) => {
                if let Some(splitter) = splitter {
                    splitter.offer(chunk, Some(&msg));
                }
                ChunkOutcome::Decoded(msg.to_record(chunk))
            }
            Err(e) => {
                if let Some(splitter) = splitter {
                    // SCCP addressing may be intact behind a damaged TCAP
                    let partial = if splitter.key().needs_decode() {
                        decode_addressing(&chunk.payload).ok()
                    } else {
                        None
                    };
                    splitter.offer(chunk, partial.as_ref());
                }
                failure(e.into())
            }
        }
    }

    /// Drain `source` into `sink`. Stops early only when the sink fails.
    #[instrument(skip_all, fields(ppid = self.config.demux.payload_protocol_id))]
    pub async fn run<S, K>(
        &self,
        source: &mut S,
        sink: &mut K,
        mut splitter: Option<FrameSplitter>,
    ) -> Result<ProbeReport>
    where
        S: ChunkSource + ?Sized,
        K: RecordSink + ?Sized,
    {
        let mut stats = ProbeStats::default();
        let mut failures = Vec::new();

        while let Some(chunk) = source.next_chunk().await {
            let outcome = self.handle(&chunk, splitter.as_mut());
            stats.record(&outcome);
            match outcome {
                ChunkOutcome::Decoded(record) => sink.write(record).await?,
                ChunkOutcome::Skipped => {}
                ChunkOutcome::Failed(failure) => failures.push(failure),
            }
        }

        info!(
            seen = stats.seen,
            decoded = stats.decoded,
            failed = stats.failed,
            skipped = stats.skipped,
            too_large = stats.too_large,
            "capture drained"
        );

        Ok(ProbeReport {
            stats,
            failures,
            splitter,
        })
    }
}
