//! Transport module - concrete byte-stream openers.
//!
//! The session is generic over any `AsyncRead + AsyncWrite` stream; this
//! module opens the one the endpoint actually ships on, a serial line.

mod serial;

pub use serial::{open, open_with_baud, DEFAULT_BAUD};
