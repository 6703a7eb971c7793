//! SkyGnome core library for decoding the set-top box serial protocol.
//!
//! This crate implements the decoding pipeline used by the CLI: byte sources
//! feed a resumable framer, complete packets are walked block by block by the
//! packet decoder (layout/reader/parser), each block is dispatched on its
//! action code, and free-text synopses are mined for metadata, attributes and
//! content warnings. All I/O is isolated in `source` modules; decoding itself
//! is synchronous and side-effect free.
//!
//! Invariants:
//! - Exactly one `DecodedEvent` is produced per complete packet.
//! - No state survives across packets except the framer's accumulation buffer.
//! - Decoding never fails outward; malformed input degrades to null fields or
//!   a silent resynchronization on the next start marker.
//!
//! # Examples
//! ```
//! use skygnome_core::{Decoder, PacketBuilder};
//!
//! let bytes = PacketBuilder::new()
//!     .block("SSCN", "101")
//!     .block("SSCA", "BBC One")
//!     .to_bytes();
//!
//! let mut decoder = Decoder::new();
//! let mut events = Vec::new();
//! decoder.push(&bytes, |event| {
//!     events.push(event);
//!     std::ops::ControlFlow::Continue(())
//! });
//! assert_eq!(events[0].channel.number, Some(101));
//! assert_eq!(events[0].channel.name.as_deref(), Some("BBC One"));
//! ```

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

mod protocol;
mod session;
mod source;
mod synopsis;

pub use protocol::builder::PacketBuilder;
pub use protocol::error::ProtocolError;
pub use protocol::framer::{ByteFramer, FramerConfig, FramerEvent};
pub use protocol::parser::{DecodeOutcome, decode_packet, decode_packet_at};
pub use protocol::{Action, Packet};
pub use session::{Decoder, DecoderStats, SessionSummary, StopReason, listen};
pub use source::{
    ByteSource, CHUNK_SIZE, LINE_SETTINGS, LineSettings, ReaderSource, SourceError, open_device,
};
pub use synopsis::{mine_synopsis, normalize};

/// Structured record produced for every complete packet.
///
/// Every field starts out null or empty so the serialized schema is the same
/// for every packet, whichever blocks it happened to carry.
///
/// # Examples
/// ```
/// use skygnome_core::DecodedEvent;
/// use time::OffsetDateTime;
///
/// let event = DecodedEvent::empty(OffsetDateTime::UNIX_EPOCH);
/// assert!(event.channel.number.is_none());
/// assert!(event.program.warnings.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedEvent {
    /// Time at which the packet was identified and the record created.
    #[serde(with = "time::serde::rfc3339")]
    pub received: OffsetDateTime,
    pub channel: Channel,
    pub program: Program,
    pub showing: Showing,
    pub epg: Epg,
    pub system: SystemState,
}

impl DecodedEvent {
    /// Create a record with every group in its empty state.
    pub fn empty(received: OffsetDateTime) -> Self {
        Self {
            received,
            channel: Channel::default(),
            program: Program::default(),
            showing: Showing::default(),
            epg: Epg::default(),
            system: SystemState::default(),
        }
    }
}

/// Currently tuned channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Leading integer of the payload, sign included.
    pub number: Option<i32>,
    pub name: Option<String>,
}

/// Program metadata, partly mined out of the synopsis text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub title: Option<String>,
    /// Synopsis with extracted metadata, attributes and warnings removed.
    pub synopsis: Option<String>,
    pub season: Option<u32>,
    pub episodes: Option<u32>,
    pub episode: Option<u32>,
    /// Running time in minutes.
    pub duration: Option<u32>,
    pub year: Option<u32>,
    /// Content warning labels in detection order.
    pub warnings: Vec<String>,
}

/// Broadcast details of the current showing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showing {
    #[serde(with = "time::serde::rfc3339::option")]
    pub started: Option<OffsetDateTime>,
    /// Attribute labels (e.g. "high definition") in bracket order.
    pub attributes: Vec<String>,
}

/// Raw echoes of guide payloads, before any synopsis mining.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epg {
    pub channel: Option<String>,
    pub started: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Box status reported alongside (or instead of) guide data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemState {
    pub message: Option<String>,
    /// Lowercased playback state such as "pause" or "fwd".
    pub trickplay: Option<String>,
    pub pin: Option<bool>,
    pub power: Option<bool>,
    pub interactive: Option<bool>,
    /// Unrecognized actions as `code:payload`, in block order.
    pub other: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_event_serializes_every_field_as_null() {
        let event = DecodedEvent::empty(OffsetDateTime::UNIX_EPOCH);
        let value = serde_json::to_value(&event).expect("event json");

        assert_eq!(value["received"], "1970-01-01T00:00:00Z");
        assert!(value["channel"]["number"].is_null());
        assert!(value["program"]["synopsis"].is_null());
        assert!(value["showing"]["started"].is_null());
        assert!(value["epg"]["description"].is_null());
        assert!(value["system"]["pin"].is_null());
        assert_eq!(value["program"]["warnings"], serde_json::json!([]));
        assert_eq!(value["system"]["other"], serde_json::json!([]));
    }

    #[test]
    fn event_roundtrips_through_json() {
        let mut event = DecodedEvent::empty(OffsetDateTime::UNIX_EPOCH);
        event.showing.started = Some(OffsetDateTime::UNIX_EPOCH);
        event.showing.attributes.push("subtitles".to_string());

        let json = serde_json::to_string(&event).expect("serialize");
        let parsed: DecodedEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, event);
    }
}
