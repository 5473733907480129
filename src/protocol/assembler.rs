//! Frame assembler for accumulating partial reads.
//!
//! Serial reads hand over whatever bytes are in flight, so one read is not
//! one frame. The assembler buffers bytes in a `bytes::BytesMut` and carves
//! complete frames off the front. Completeness mirrors the classifier's
//! shape rules:
//!
//! - head `'N'`: complete at 6 bytes with CRLF in bytes 4..6. The value
//!   byte is raw and may itself be CR or LF, so terminator scanning alone
//!   would carve too early.
//! - head `'D'`: complete at 5 bytes with CRLF in bytes 3..5.
//! - anything else: complete at the first CRLF, inclusive.
//!
//! A CRLF that ends before a shape's structural position carves a short
//! junk line instead (this is how a bare `D\r\n` surfaces as its own
//! 3-byte frame). The short-line rule is checked first so that carving
//! does not depend on how the stream was chunked across reads.
//!
//! # Example
//!
//! ```
//! use gridwire::protocol::FrameAssembler;
//!
//! let mut assembler = FrameAssembler::new();
//! let frames = assembler.push(b"AT\r\nC\r").unwrap();
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].as_bytes(), b"AT\r\n");
//!
//! let frames = assembler.push(b"\n").unwrap();
//! assert_eq!(frames[0].as_bytes(), b"C\r\n");
//! ```

use bytes::BytesMut;

use super::wire::{DEBUG_FRAME_LEN, NUMBER_FRAME_LEN};
use super::Frame;
use crate::error::{GridwireError, Result};

/// Default cap on pending unterminated bytes.
///
/// The longest legal frame is 6 bytes; the cap only bounds line noise.
pub const DEFAULT_MAX_FRAME_LEN: usize = 256;

/// Buffer for accumulating incoming bytes and extracting complete frames.
///
/// Carving state lives entirely in the buffered bytes, so the assembler
/// produces the same frames no matter how the stream is fragmented.
#[derive(Debug)]
pub struct FrameAssembler {
    /// Accumulated bytes from transport reads.
    buffer: BytesMut,
    /// Maximum pending bytes before the buffer is declared junk.
    max_frame_len: usize,
}

impl FrameAssembler {
    /// Create an assembler with the default pending cap.
    pub fn new() -> Self {
        Self::with_max_frame_len(DEFAULT_MAX_FRAME_LEN)
    }

    /// Create an assembler with a custom pending cap.
    pub fn with_max_frame_len(max_frame_len: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(max_frame_len),
            max_frame_len,
        }
    }

    /// Push data into the buffer and extract all complete frames.
    ///
    /// Returns the frames completed by this push, possibly none. Partial
    /// data stays buffered for the next push.
    ///
    /// # Errors
    ///
    /// Returns [`GridwireError::FrameOverflow`] when the pending bytes
    /// exceed the cap without forming a frame. The pending bytes are
    /// discarded so the next push starts clean; frames carved earlier in
    /// the same push are dropped with them, the line being desynchronized
    /// at that point anyway.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.try_extract_one() {
            frames.push(frame);
        }

        if self.buffer.len() > self.max_frame_len {
            let dropped = self.buffer.len();
            self.buffer.clear();
            return Err(GridwireError::FrameOverflow { dropped });
        }

        Ok(frames)
    }

    /// Carve one frame off the front of the buffer, if complete.
    fn try_extract_one(&mut self) -> Option<Frame> {
        let end = self.frame_end()?;
        let bytes = self.buffer.split_to(end).freeze();
        Some(Frame::new(bytes))
    }

    /// Length of the complete frame at the front of the buffer, if any.
    fn frame_end(&self) -> Option<usize> {
        let buf = &self.buffer[..];
        match buf.first() {
            None => None,
            Some(b'N') => {
                // A CRLF ending before the structural position is a short
                // junk line. In a well-formed Number frame no such pair can
                // exist: bytes 1..3 are digits and a CR value byte at 3 is
                // followed by the structural CR, not LF.
                if let Some(i) = find_crlf_limit(buf, NUMBER_FRAME_LEN - 2) {
                    return Some(i + 2);
                }
                if buf.len() >= NUMBER_FRAME_LEN {
                    if buf[4] == b'\r' && buf[5] == b'\n' {
                        return Some(NUMBER_FRAME_LEN);
                    }
                    return find_crlf(buf).map(|i| i + 2);
                }
                None
            }
            Some(b'D') => {
                if let Some(i) = find_crlf_limit(buf, DEBUG_FRAME_LEN - 2) {
                    return Some(i + 2);
                }
                if buf.len() >= DEBUG_FRAME_LEN {
                    if buf[3] == b'\r' && buf[4] == b'\n' {
                        return Some(DEBUG_FRAME_LEN);
                    }
                    return find_crlf(buf).map(|i| i + 2);
                }
                None
            }
            Some(_) => find_crlf(buf).map(|i| i + 2),
        }
    }

    /// Number of buffered pending bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when no partial frame is pending.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard any pending bytes.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the CR of the first CRLF pair, if any.
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// Like [`find_crlf`], but only pairs whose CR index is below `limit`.
fn find_crlf_limit(buf: &[u8], limit: usize) -> Option<usize> {
    buf.windows(2).take(limit).position(|w| w == b"\r\n")
}
