//! Error types for gridwire.

use thiserror::Error;

/// Main error type for all gridwire operations.
#[derive(Debug, Error)]
pub enum GridwireError {
    /// I/O error on the transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port open/configure error.
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Unterminated input exceeded the assembler cap; the pending bytes
    /// were discarded.
    #[error("frame overflow, dropped {dropped} unterminated bytes")]
    FrameOverflow { dropped: usize },

    /// The peer never acknowledged a bulk-transfer cell. Coordinates are
    /// one-based, matching the wire.
    #[error("no ack for cell ({row},{col}) within the deadline")]
    AckTimeout { row: u8, col: u8 },

    /// Write side is gone.
    #[error("connection closed")]
    ConnectionClosed,
}

/// Result type alias using GridwireError.
pub type Result<T> = std::result::Result<T, GridwireError>;
