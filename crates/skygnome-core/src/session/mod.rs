//! Listening session: open a byte source, decode until told to stop.
//!
//! The consumer callback receives either a decoded record or a transport
//! error. Returning `ControlFlow::Break` ends the session after the current
//! packet; the source is dropped (closed) when the session returns.

mod decoder;

pub use decoder::{Decoder, DecoderStats};

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::DecodedEvent;
use crate::source::{ByteSource, SourceError};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The callback asked to stop.
    Cancelled,
    /// The source ran out of bytes.
    EndOfStream,
    /// The source could not be opened; nothing was read.
    OpenFailed,
    /// Reading failed after the source was opened.
    ReadFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub reason: StopReason,
    pub stats: DecoderStats,
}

/// Open a source and decode it until the callback breaks or the source ends.
///
/// An open failure is reported to the callback once and the session returns
/// without attaching to the source. A read failure is reported the same way
/// and also ends the session; the callback's answer to an error is ignored.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use std::ops::ControlFlow;
///
/// use skygnome_core::{Decoder, PacketBuilder, ReaderSource, StopReason, listen};
///
/// let bytes = PacketBuilder::new().block("SSCA", "BBC One").to_bytes();
/// let mut decoder = Decoder::new();
/// let mut names = Vec::new();
/// let summary = listen(
///     || Ok(ReaderSource::new(Cursor::new(bytes))),
///     &mut decoder,
///     |result| {
///         if let Ok(event) = result {
///             names.extend(event.channel.name);
///         }
///         ControlFlow::Continue(())
///     },
/// );
/// assert_eq!(summary.reason, StopReason::EndOfStream);
/// assert_eq!(names, vec!["BBC One".to_string()]);
/// ```
pub fn listen<S, O, F>(open: O, decoder: &mut Decoder, mut callback: F) -> SessionSummary
where
    S: ByteSource,
    O: FnOnce() -> Result<S, SourceError>,
    F: FnMut(Result<DecodedEvent, SourceError>) -> ControlFlow<()>,
{
    let mut source = match open() {
        Ok(source) => source,
        Err(err) => {
            warn!(%err, "failed to open source");
            let _ = callback(Err(err));
            return summary(StopReason::OpenFailed, decoder);
        }
    };
    debug!("source opened");

    loop {
        let chunk = match source.next_chunk() {
            Ok(Some(chunk)) => chunk,
            Ok(None) => {
                debug!("source exhausted");
                return summary(StopReason::EndOfStream, decoder);
            }
            Err(err) => {
                warn!(%err, "failed to read source");
                let _ = callback(Err(err));
                return summary(StopReason::ReadFailed, decoder);
            }
        };
        if decoder.push(&chunk, |event| callback(Ok(event))).is_break() {
            debug!("listener cancelled");
            return summary(StopReason::Cancelled, decoder);
        }
    }
}

fn summary(reason: StopReason, decoder: &Decoder) -> SessionSummary {
    SessionSummary {
        reason,
        stats: decoder.stats(),
    }
}
