use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::DecodedEvent;
use crate::protocol::framer::{ByteFramer, FramerConfig, FramerEvent};
use crate::protocol::parser::{decode_packet_at, local_now};

/// Counters kept across the lifetime of a decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderStats {
    pub bytes: u64,
    pub packets: u64,
    /// Buffers dropped because the declared length could not be met.
    pub desyncs: u64,
    /// Buffers dropped by the maximum packet size guard.
    pub overflows: u64,
    /// Partial packets cut off by a new start marker.
    pub abandoned: u64,
    /// Packets whose block walk stopped early.
    pub malformed_blocks: u64,
}

/// Streaming decoder: framer plus per-packet decoding.
///
/// Bytes may be pushed in chunks of any size; a packet split across chunks
/// is completed by a later push.
pub struct Decoder {
    framer: ByteFramer,
    stats: DecoderStats,
    clock: fn() -> OffsetDateTime,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_config(FramerConfig::default())
    }

    pub fn with_config(config: FramerConfig) -> Self {
        Self {
            framer: ByteFramer::with_config(config),
            stats: DecoderStats::default(),
            clock: local_now,
        }
    }

    /// Replace the clock used for `received` and start-time resolution.
    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Feed a chunk, handing each decoded record to `on_event` in arrival
    /// order. When `on_event` breaks, the rest of the chunk is dropped, so
    /// cancellation always lands on a packet boundary.
    pub fn push<F>(&mut self, chunk: &[u8], mut on_event: F) -> ControlFlow<()>
    where
        F: FnMut(DecodedEvent) -> ControlFlow<()>,
    {
        for &byte in chunk {
            self.stats.bytes += 1;
            let Some(framed) = self.framer.feed(byte) else {
                continue;
            };
            match framed {
                FramerEvent::Packet(packet) => {
                    self.stats.packets += 1;
                    let outcome = decode_packet_at(&packet, (self.clock)());
                    debug!(len = packet.len(), blocks = outcome.blocks, "decoded packet");
                    if let Some(err) = &outcome.error {
                        self.stats.malformed_blocks += 1;
                        debug!(%err, "block walk stopped early");
                    }
                    if on_event(outcome.event).is_break() {
                        return ControlFlow::Break(());
                    }
                }
                FramerEvent::Desync { buffered } => {
                    self.stats.desyncs += 1;
                    warn!(buffered, "framing desync, waiting for next start marker");
                }
                FramerEvent::Overflow { buffered } => {
                    self.stats.overflows += 1;
                    warn!(
                        buffered,
                        limit = self.framer.config().max_packet_len,
                        "packet exceeds size limit, dropping"
                    );
                }
                FramerEvent::Abandoned { buffered } => {
                    self.stats.abandoned += 1;
                    debug!(buffered, "partial packet cut off by start marker");
                }
            }
        }
        ControlFlow::Continue(())
    }
}
