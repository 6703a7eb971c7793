use thiserror::Error;

/// Problems found while walking the blocks of a complete packet.
///
/// These never abort decoding: the walk stops at the offending block and the
/// record built so far is still delivered.
///
/// # Examples
/// ```
/// use skygnome_core::ProtocolError;
///
/// let err = ProtocolError::BlockTooShort { offset: 3, length: 2 };
/// assert!(err.to_string().contains("block too short"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("truncated block header at offset {offset}: need {needed} bytes, got {actual}")]
    TruncatedHeader {
        offset: usize,
        needed: usize,
        actual: usize,
    },
    #[error("invalid block length at offset {offset}: {value:?}")]
    InvalidBlockLength { offset: usize, value: String },
    #[error("block too short at offset {offset}: declared {length} bytes")]
    BlockTooShort { offset: usize, length: usize },
}
