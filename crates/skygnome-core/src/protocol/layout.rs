/// Start-of-packet marker byte (line feed). Never part of packet content.
pub const PACKET_START: u8 = 0x0a;

/// Width of the decimal total-length field at the start of a packet.
pub const PACKET_LEN_WIDTH: usize = 3;
pub const PACKET_LEN_RANGE: std::ops::Range<usize> = 0..PACKET_LEN_WIDTH;
/// Largest total length a three-digit field can declare.
pub const PACKET_MAX_LEN: usize = 999;

pub const ACTION_WIDTH: usize = 4;
pub const BLOCK_LEN_WIDTH: usize = 3;
/// Action code plus block length; the block length counts this header too.
pub const BLOCK_HEADER_LEN: usize = ACTION_WIDTH + BLOCK_LEN_WIDTH;

pub const ACTION_RANGE: std::ops::Range<usize> = 0..ACTION_WIDTH;
pub const BLOCK_LEN_RANGE: std::ops::Range<usize> = ACTION_WIDTH..BLOCK_HEADER_LEN;
