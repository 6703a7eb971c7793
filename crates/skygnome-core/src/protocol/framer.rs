use super::Packet;
use super::layout;
use super::reader::read_declared_len;

/// Limits applied while accumulating a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramerConfig {
    /// Largest buffer accepted between start markers before giving up.
    pub max_packet_len: usize,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            max_packet_len: layout::PACKET_MAX_LEN,
        }
    }
}

/// Outcome of feeding one byte that changed more than the buffer contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramerEvent {
    /// Buffer length matched its declared length.
    Packet(Packet),
    /// Declared length is unreadable or already exceeded; buffer dropped.
    Desync { buffered: usize },
    /// Buffer grew past `FramerConfig::max_packet_len`; buffer dropped.
    Overflow { buffered: usize },
    /// A start marker arrived before the previous packet completed.
    Abandoned { buffered: usize },
}

#[derive(Debug)]
enum State {
    /// Waiting for a start marker; other bytes are discarded.
    Idle,
    Accumulating(Vec<u8>),
}

/// Resumable splitter turning a byte stream into self-delimited packets.
///
/// Transition table:
///
/// | state        | input        | next         | emits                       |
/// |--------------|--------------|--------------|-----------------------------|
/// | Idle         | marker       | Accumulating | -                           |
/// | Idle         | other        | Idle         | -                           |
/// | Accumulating | marker       | Accumulating | `Abandoned` if buffer held data |
/// | Accumulating | length match | Idle         | `Packet`                    |
/// | Accumulating | bad length   | Idle         | `Desync`                    |
/// | Accumulating | over limit   | Idle         | `Overflow`                  |
/// | Accumulating | other        | Accumulating | -                           |
///
/// Returning to Idle after a match means trailing bytes are ignored until the
/// next marker, exactly as if they had kept growing a buffer that can never
/// match again.
///
/// # Examples
/// ```
/// use skygnome_core::{ByteFramer, FramerEvent};
///
/// let mut framer = ByteFramer::new();
/// let mut packets = Vec::new();
/// for byte in b"\n013SSCN010101" {
///     if let Some(FramerEvent::Packet(packet)) = framer.feed(*byte) {
///         packets.push(packet.text());
///     }
/// }
/// assert_eq!(packets, vec!["013SSCN010101".to_string()]);
/// ```
#[derive(Debug)]
pub struct ByteFramer {
    state: State,
    config: FramerConfig,
}

impl Default for ByteFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteFramer {
    pub fn new() -> Self {
        Self::with_config(FramerConfig::default())
    }

    pub fn with_config(config: FramerConfig) -> Self {
        Self {
            state: State::Idle,
            config,
        }
    }

    pub fn config(&self) -> FramerConfig {
        self.config
    }

    /// True while waiting for a start marker.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Number of bytes accumulated for the packet in progress.
    pub fn buffered(&self) -> usize {
        match &self.state {
            State::Idle => 0,
            State::Accumulating(buffer) => buffer.len(),
        }
    }

    pub fn feed(&mut self, byte: u8) -> Option<FramerEvent> {
        if byte == layout::PACKET_START {
            let previous = std::mem::replace(&mut self.state, State::Accumulating(Vec::new()));
            return match previous {
                State::Accumulating(buffer) if !buffer.is_empty() => Some(FramerEvent::Abandoned {
                    buffered: buffer.len(),
                }),
                _ => None,
            };
        }

        let buffer = match &mut self.state {
            State::Idle => return None,
            State::Accumulating(buffer) => buffer,
        };
        buffer.push(byte);

        let len = buffer.len();
        if len <= layout::PACKET_LEN_WIDTH {
            return None;
        }
        let event = match read_declared_len(buffer) {
            Some(declared) if declared == len => {
                FramerEvent::Packet(Packet::from_bytes(std::mem::take(buffer)))
            }
            Some(declared) if declared > len && len < self.config.max_packet_len => return None,
            Some(declared) if declared > len => FramerEvent::Overflow { buffered: len },
            _ => FramerEvent::Desync { buffered: len },
        };
        self.state = State::Idle;
        Some(event)
    }
}
