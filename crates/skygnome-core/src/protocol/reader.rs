use super::error::ProtocolError;
use super::layout;

/// Read-only cursor helpers over a complete packet body.
pub struct PacketReader<'a> {
    packet: &'a [u8],
}

/// Header of one action block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub action: String,
    pub length: usize,
}

impl<'a> PacketReader<'a> {
    pub fn new(packet: &'a [u8]) -> Self {
        Self { packet }
    }

    pub fn len(&self) -> usize {
        self.packet.len()
    }

    pub fn require_len(&self, offset: usize, needed: usize) -> Result<(), ProtocolError> {
        let actual = self.packet.len().saturating_sub(offset);
        if actual < needed {
            return Err(ProtocolError::TruncatedHeader {
                offset,
                needed,
                actual,
            });
        }
        Ok(())
    }

    /// Read the action code and block length of the block starting at `offset`.
    pub fn read_block_header(&self, offset: usize) -> Result<BlockHeader, ProtocolError> {
        self.require_len(offset, layout::BLOCK_HEADER_LEN)?;
        let header = &self.packet[offset..offset + layout::BLOCK_HEADER_LEN];
        let action = latin1(&header[layout::ACTION_RANGE]);
        let raw_len = &header[layout::BLOCK_LEN_RANGE];
        let length = parse_int_prefix(raw_len)
            .and_then(|value| usize::try_from(value).ok())
            .ok_or_else(|| ProtocolError::InvalidBlockLength {
                offset,
                value: latin1(raw_len),
            })?;
        if length < layout::BLOCK_HEADER_LEN {
            return Err(ProtocolError::BlockTooShort { offset, length });
        }
        Ok(BlockHeader { action, length })
    }

    /// Payload of a block, clamped to the bytes actually present.
    pub fn read_payload(&self, offset: usize, header: &BlockHeader) -> String {
        let start = (offset + layout::BLOCK_HEADER_LEN).min(self.packet.len());
        let end = (offset + header.length).min(self.packet.len());
        latin1(&self.packet[start..end])
    }
}

/// Read the declared total length from the first bytes of a packet.
pub fn read_declared_len(bytes: &[u8]) -> Option<usize> {
    let field = bytes.get(layout::PACKET_LEN_RANGE)?;
    parse_int_prefix(field).and_then(|value| usize::try_from(value).ok())
}

/// Decode bytes one character per byte (ISO-8859-1), as the box sends them.
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Parse the leading integer of a field, ignoring anything after the digits.
///
/// Leading whitespace and a sign are accepted; `None` when no digit follows.
/// Channel numbers arrive padded while being typed (`"10_"`), so trailing
/// junk must not invalidate the value.
pub fn parse_int_prefix(bytes: &[u8]) -> Option<i64> {
    let mut rest = bytes;
    while let [first, tail @ ..] = rest {
        if first.is_ascii_whitespace() {
            rest = tail;
        } else {
            break;
        }
    }
    let negative = match rest.first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };
    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let mut value: i64 = 0;
    for digit in &rest[..digits] {
        value = value
            .checked_mul(10)?
            .checked_add(i64::from(digit - b'0'))?;
    }
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::{PacketReader, latin1, parse_int_prefix, read_declared_len};
    use crate::protocol::error::ProtocolError;

    #[test]
    fn parse_int_prefix_ignores_trailing_padding() {
        assert_eq!(parse_int_prefix(b"10_"), Some(10));
        assert_eq!(parse_int_prefix(b"1__"), Some(1));
        assert_eq!(parse_int_prefix(b" 42"), Some(42));
        assert_eq!(parse_int_prefix(b"-7x"), Some(-7));
    }

    #[test]
    fn parse_int_prefix_rejects_non_numeric() {
        assert_eq!(parse_int_prefix(b"abc"), None);
        assert_eq!(parse_int_prefix(b""), None);
        assert_eq!(parse_int_prefix(b"-"), None);
    }

    #[test]
    fn declared_len_needs_three_bytes() {
        assert_eq!(read_declared_len(b"019SSCN"), Some(19));
        assert_eq!(read_declared_len(b"01"), None);
        assert_eq!(read_declared_len(b"x19SSCN"), None);
    }

    #[test]
    fn latin1_maps_high_bytes_to_chars() {
        assert_eq!(latin1(&[0x43, 0x61, 0x66, 0xe9]), "Café");
    }

    #[test]
    fn read_block_header_ok() {
        let reader = PacketReader::new(b"013SSCN010101");
        let header = reader.read_block_header(3).unwrap();
        assert_eq!(header.action, "SSCN");
        assert_eq!(header.length, 10);
        assert_eq!(reader.read_payload(3, &header), "101");
    }

    #[test]
    fn read_block_header_truncated() {
        let reader = PacketReader::new(b"010SSCN0");
        let err = reader.read_block_header(3).unwrap_err();
        assert!(matches!(err, ProtocolError::TruncatedHeader { actual: 5, .. }));
    }

    #[test]
    fn read_block_header_rejects_short_length() {
        let reader = PacketReader::new(b"010SSCN000");
        let err = reader.read_block_header(3).unwrap_err();
        assert_eq!(err, ProtocolError::BlockTooShort { offset: 3, length: 0 });
    }

    #[test]
    fn read_block_header_rejects_non_numeric_length() {
        let reader = PacketReader::new(b"010SSCNabc");
        let err = reader.read_block_header(3).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidBlockLength { .. }));
    }

    #[test]
    fn read_payload_is_clamped_to_packet() {
        let reader = PacketReader::new(b"012SSCN0201");
        let header = reader.read_block_header(3).unwrap();
        assert_eq!(reader.read_payload(3, &header), "1");
    }
}
