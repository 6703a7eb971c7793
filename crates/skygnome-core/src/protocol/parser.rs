use time::OffsetDateTime;
use tracing::trace;

use crate::DecodedEvent;
use crate::synopsis::mine_synopsis;

use super::Packet;
use super::action::Action;
use super::error::ProtocolError;
use super::layout;
use super::reader::PacketReader;

/// Record decoded from one packet, plus the block problem that cut the walk
/// short, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutcome {
    pub event: DecodedEvent,
    /// Number of blocks dispatched.
    pub blocks: usize,
    pub error: Option<ProtocolError>,
}

/// Owns the record for the duration of one packet's decode.
struct EventBuilder {
    event: DecodedEvent,
    now: OffsetDateTime,
}

impl EventBuilder {
    fn new(now: OffsetDateTime) -> Self {
        Self {
            event: DecodedEvent::empty(now),
            now,
        }
    }

    fn apply(&mut self, code: &str, payload: &str) {
        let action = Action::from_code(code);
        trace!(code, ?action, payload, "dispatching block");
        action.apply(code, payload, &mut self.event, self.now);

        // title and synopsis may arrive in either order, so mine after every
        // block once a synopsis is present
        if self.event.program.synopsis.is_some() {
            mine_synopsis(&mut self.event);
        }
    }

    fn finish(self) -> DecodedEvent {
        self.event
    }
}

/// Decode a complete packet against the current local time.
pub fn decode_packet(packet: &Packet) -> DecodeOutcome {
    decode_packet_at(packet, local_now())
}

/// Decode a complete packet, resolving start times against `now`.
///
/// # Examples
/// ```
/// use skygnome_core::{Packet, decode_packet_at};
/// use time::OffsetDateTime;
///
/// let packet = Packet::from_bytes(b"012ZZZZ009hi".to_vec());
/// let outcome = decode_packet_at(&packet, OffsetDateTime::UNIX_EPOCH);
/// assert_eq!(outcome.event.system.other, vec!["ZZZZ:hi".to_string()]);
/// ```
pub fn decode_packet_at(packet: &Packet, now: OffsetDateTime) -> DecodeOutcome {
    let reader = PacketReader::new(packet.as_bytes());
    let mut builder = EventBuilder::new(now);
    let mut offset = layout::PACKET_LEN_WIDTH;
    let mut blocks = 0;
    let mut error = None;

    while offset < reader.len() {
        let header = match reader.read_block_header(offset) {
            Ok(header) => header,
            Err(err) => {
                error = Some(err);
                break;
            }
        };
        let payload = reader.read_payload(offset, &header);
        builder.apply(&header.action, &payload);
        blocks += 1;
        offset += header.length;
    }

    DecodeOutcome {
        event: builder.finish(),
        blocks,
        error,
    }
}

/// Local wall-clock time, or UTC when the local offset cannot be determined.
pub(crate) fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
