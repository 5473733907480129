//! Frame type produced by the assembler.
//!
//! A frame is one carved line, terminator included. Uses `bytes::Bytes` so
//! carving out of the read buffer never copies.

use bytes::Bytes;

use super::command::{classify, Command};

/// One complete frame as received, CRLF included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Wrap carved bytes.
    pub fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }

    /// Copy a byte slice into a frame.
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    /// The raw frame bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Frame length in bytes, terminator included.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Classify this frame.
    #[inline]
    pub fn command(&self) -> Command {
        classify(&self.bytes)
    }

    /// Unwrap into the underlying buffer (cheap, zero-copy).
    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
