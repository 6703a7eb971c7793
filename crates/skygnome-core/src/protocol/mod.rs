//! Wire protocol of the set-top box serial link.
//!
//! Follows the layered structure used across the crate:
//! - `layout`: field widths and marker values (source of truth)
//! - `reader`: safe access to packet bytes and numeric conventions
//! - `framer`: resumable byte-to-packet state machine
//! - `action`: closed set of action codes and their record effects
//! - `parser`: block walk producing one record per packet
//! - `error`: explicit block-level errors
//!
//! A packet on the wire is a start marker (0x0a) followed by a three-digit
//! decimal total length and repeated blocks of a four-character action code,
//! a three-digit block length (header included) and the payload text.

pub mod action;
pub mod builder;
pub mod error;
pub mod framer;
pub mod layout;
pub mod parser;
pub mod reader;

pub use action::Action;

/// One complete packet body: length field plus blocks, marker excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    bytes: Vec<u8>,
}

impl Packet {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Total length announced by the packet's own length field.
    pub fn declared_len(&self) -> Option<usize> {
        reader::read_declared_len(&self.bytes)
    }

    /// Packet body as text, one character per byte.
    pub fn text(&self) -> String {
        reader::latin1(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::Packet;

    #[test]
    fn packet_reports_declared_len() {
        let packet = Packet::from_bytes(b"013SSCN010101".to_vec());
        assert_eq!(packet.declared_len(), Some(13));
        assert_eq!(packet.len(), 13);
    }
}
