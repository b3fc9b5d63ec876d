//! Incremental SSE frame codec.
//!
//! The responder writes one `data: <json>` line followed by a blank line
//! per event. Network reads do not align on those frame boundaries, so
//! [`FrameDecoder`] buffers raw bytes across reads and only decodes once a
//! complete frame has arrived.

use thiserror::Error;

use crate::protocol::StreamEvent;

/// Marker prefixing every data-carrying SSE line.
pub const DATA_PREFIX: &str = "data:";

/// Errors surfaced while decoding the event stream.
#[derive(Debug, Error)]
pub enum FrameError {
    /// A complete frame contained bytes that were not valid UTF-8.
    #[error("frame is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// A data line did not parse as a stream event.
    #[error("malformed event payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Encode one event as a self-contained SSE frame.
pub fn encode_frame(event: &StreamEvent) -> String {
    let json = serde_json::to_string(event).unwrap_or_else(|e| {
        serde_json::json!({ "error": e.to_string() }).to_string()
    });
    format!("{DATA_PREFIX} {json}\n\n")
}

/// Stateful decoder reassembling frames from an incremental byte source.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed newly read bytes and drain every event they complete.
    ///
    /// Non-`data:` lines are discarded. Bytes after the last complete frame
    /// stay buffered for the next read; frames are decoded only once their
    /// blank-line terminator has arrived, so a read boundary inside a
    /// multi-byte character never reaches the UTF-8 decode.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<StreamEvent>, FrameError> {
        self.buf.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = find_double_newline(&self.buf) {
            let frame = self.buf.drain(..pos + 2).collect::<Vec<_>>();
            let text = std::str::from_utf8(&frame)?;

            for line in text.lines() {
                let line = line.trim();
                if !line.starts_with(DATA_PREFIX) {
                    continue;
                }
                let data = line.trim_start_matches(DATA_PREFIX).trim();
                events.push(serde_json::from_str(data)?);
            }
        }
        Ok(events)
    }

    /// Number of buffered bytes not yet forming a complete frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

/// Find the position of a double newline in the buffer.
fn find_double_newline(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\n\n")
}
