//! Wire tokens and frame builders.
//!
//! Every frame on the line is a short CRLF-terminated token. Number-shaped
//! frames are fixed-length with coordinates as ASCII digits `'1'..='9'` and
//! the cell value as one raw byte.
//!
//! # Example
//!
//! ```
//! use gridwire::protocol::wire;
//!
//! let frame = wire::encode_cell(2, 9, 0x07);
//! assert_eq!(&frame, b"N29\x07\r\n");
//! ```

/// Line terminator shared by every frame.
pub const CRLF: &[u8] = b"\r\n";

/// Handshake probe from the peer.
pub const HANDSHAKE: &[u8] = b"AT\r\n";
/// Clear request.
pub const CLEAR: &[u8] = b"C\r\n";
/// Break request.
pub const BREAK: &[u8] = b"B\r\n";
/// Play request.
pub const PLAY: &[u8] = b"P\r\n";
/// Bulk-transfer request.
pub const SAVE: &[u8] = b"S\r\n";
/// Per-cell acknowledgement during a bulk transfer.
pub const ACK: &[u8] = b"T\r\n";
/// Acknowledgement token, sent as our reply and ignored when received.
pub const OK: &[u8] = b"OK\r\n";
/// Completion token for Play and for a finished bulk transfer.
pub const DONE: &[u8] = b"D\r\n";

/// Length of a complete Number-shaped frame.
pub const NUMBER_FRAME_LEN: usize = 6;
/// Length of a complete Debug-shaped frame.
pub const DEBUG_FRAME_LEN: usize = 5;

/// Encode a one-based coordinate as its ASCII digit.
#[inline]
pub fn digit(coord: u8) -> u8 {
    debug_assert!((1..=9).contains(&coord));
    b'0' + coord
}

/// Decode an ASCII digit byte `'1'..='9'` into a one-based coordinate.
///
/// Anything else, `'0'` included, is not a coordinate.
#[inline]
pub fn coord(byte: u8) -> Option<u8> {
    match byte {
        b'1'..=b'9' => Some(byte - b'0'),
        _ => None,
    }
}

/// Build an outbound Number-shaped frame, row digit first.
///
/// Inbound Number frames carry the column digit first; outbound ones are
/// row-first. The asymmetry is the peer's wire contract, not a mistake.
pub fn encode_cell(row: u8, col: u8, value: u8) -> [u8; NUMBER_FRAME_LEN] {
    [b'N', digit(row), digit(col), value, b'\r', b'\n']
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_crlf_terminated() {
        for token in [HANDSHAKE, CLEAR, BREAK, PLAY, SAVE, ACK, OK, DONE] {
            assert!(token.ends_with(CRLF));
        }
    }

    #[test]
    fn test_coord_accepts_wire_digits_only() {
        assert_eq!(coord(b'1'), Some(1));
        assert_eq!(coord(b'5'), Some(5));
        assert_eq!(coord(b'9'), Some(9));

        assert_eq!(coord(b'0'), None);
        assert_eq!(coord(b'a'), None);
        assert_eq!(coord(b'\r'), None);
        assert_eq!(coord(0xFF), None);
    }

    #[test]
    fn test_digit_coord_inverse() {
        for n in 1..=9u8 {
            assert_eq!(coord(digit(n)), Some(n));
        }
    }

    #[test]
    fn test_encode_cell_layout() {
        let frame = encode_cell(1, 1, 0);
        assert_eq!(&frame, b"N11\x00\r\n");

        let frame = encode_cell(9, 3, 255);
        assert_eq!(frame[0], b'N');
        assert_eq!(frame[1], b'9');
        assert_eq!(frame[2], b'3');
        assert_eq!(frame[3], 255);
        assert_eq!(&frame[4..], CRLF);
    }

    #[test]
    fn test_encode_cell_value_is_raw() {
        // A CR value byte must not disturb the frame layout.
        let frame = encode_cell(4, 4, b'\r');
        assert_eq!(frame.len(), NUMBER_FRAME_LEN);
        assert_eq!(frame[3], b'\r');
        assert_eq!(&frame[4..], CRLF);
    }
}
