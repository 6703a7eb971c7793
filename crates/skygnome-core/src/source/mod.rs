//! Byte sources feeding the decoder.
//!
//! The transport is outside the decoding core: a source hands over whatever
//! chunk of bytes it has, of any size, and reports open and read failures.
//! Line settings for the serial link are fixed by the box and documented
//! here, but configuring the port is left to the operating system.

mod reader;

pub use reader::{ReaderSource, open_device};

use thiserror::Error;

/// Serial line parameters the box transmits with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSettings {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: bool,
}

/// 57600 baud, 8 data bits, 1 stop bit, no parity.
pub const LINE_SETTINGS: LineSettings = LineSettings {
    baud_rate: 57_600,
    data_bits: 8,
    stop_bits: 1,
    parity: false,
};

/// Read size used by `ReaderSource`.
pub const CHUNK_SIZE: usize = 4096;

pub trait ByteSource {
    /// Next chunk of bytes; `Ok(None)` once the source is exhausted.
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl std::fmt::Display for LineSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parity = if self.parity { "parity" } else { "no parity" };
        write!(
            f,
            "{} baud, {} data bits, {} stop bit, {}",
            self.baud_rate, self.data_bits, self.stop_bits, parity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::LINE_SETTINGS;

    #[test]
    fn line_settings_display() {
        assert_eq!(
            LINE_SETTINGS.to_string(),
            "57600 baud, 8 data bits, 1 stop bit, no parity"
        );
    }
}
