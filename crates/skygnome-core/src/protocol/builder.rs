use super::layout;

/// Encodes action/payload pairs into wire bytes.
///
/// Used to synthesize captures for tests and fixtures; the box never accepts
/// input on this link. Lengths above 999 cannot be expressed by the
/// three-digit fields, so such packets will not frame.
///
/// # Examples
/// ```
/// use skygnome_core::PacketBuilder;
///
/// let bytes = PacketBuilder::new().block("SSCN", "101").to_bytes();
/// assert_eq!(bytes, b"\n013SSCN010101".to_vec());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketBuilder {
    blocks: Vec<(String, String)>,
}

impl PacketBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block; `action` is expected to be four characters.
    pub fn block(mut self, action: &str, payload: &str) -> Self {
        self.blocks.push((action.to_string(), payload.to_string()));
        self
    }

    /// Packet body: total length followed by the blocks, no start marker.
    pub fn body(&self) -> Vec<u8> {
        let mut blocks = Vec::new();
        for (action, payload) in &self.blocks {
            let payload = encode_latin1(payload);
            let block_len = layout::BLOCK_HEADER_LEN + payload.len();
            blocks.extend(encode_latin1(action));
            blocks.extend(format!("{block_len:03}").into_bytes());
            blocks.extend(payload);
        }
        let total = layout::PACKET_LEN_WIDTH + blocks.len();
        let mut body = format!("{total:03}").into_bytes();
        body.extend(blocks);
        body
    }

    /// Start marker followed by the packet body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![layout::PACKET_START];
        bytes.extend(self.body());
        bytes
    }
}

/// One byte per character; characters outside ISO-8859-1 become `?`.
fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
