//! Command classification over raw frame bytes.
//!
//! [`classify`] turns one carved frame into a [`Command`]. Rules are checked
//! in a fixed order and the first match wins; the order is part of the wire
//! contract and must not be reshuffled into a lookup table.

use super::wire;

/// Every input the endpoint distinguishes.
///
/// Coordinates are one-based, exactly as they travel on the wire. The
/// session layer converts to zero-based store indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `AT` probe; expects `OK`.
    Handshake,
    /// `C`; acknowledged but otherwise a no-op.
    Clear,
    /// `B`; acknowledged.
    Break,
    /// `P`; acknowledged, then `D` after a delay.
    Play,
    /// `N`-shaped cell write. Inbound frames carry the column digit first.
    Number { row: u8, col: u8, value: u8 },
    /// `D`-shaped cell query, row digit first.
    Debug { row: u8, col: u8 },
    /// `S`; starts the bulk transfer.
    Save,
    /// `T`, the per-cell bulk-transfer acknowledgement.
    Ack,
    /// `OK` from the peer; consumed without a reply.
    PeerOk,
    /// Anything else. Not an error: the frame is logged and dropped.
    Unknown,
}

/// Classify one frame.
///
/// Shape rules index at most `len - 1` bytes past their length guard, so a
/// frame of any length is safe to classify. Shaped rules only pin down the
/// head byte, the terminator position and the coordinate digits; a frame
/// failing the digit check falls through to the later rules.
pub fn classify(frame: &[u8]) -> Command {
    if frame == wire::HANDSHAKE {
        return Command::Handshake;
    }
    if frame == wire::CLEAR {
        return Command::Clear;
    }
    if frame == wire::BREAK {
        return Command::Break;
    }
    if frame == wire::PLAY {
        return Command::Play;
    }

    if frame.len() >= wire::NUMBER_FRAME_LEN
        && frame[0] == b'N'
        && frame[4] == b'\r'
        && frame[5] == b'\n'
    {
        // Column digit first on inbound Number frames.
        if let (Some(col), Some(row)) = (wire::coord(frame[1]), wire::coord(frame[2])) {
            return Command::Number {
                row,
                col,
                value: frame[3],
            };
        }
    }

    if frame.len() >= wire::DEBUG_FRAME_LEN
        && frame[0] == b'D'
        && frame[3] == b'\r'
        && frame[4] == b'\n'
    {
        if let (Some(row), Some(col)) = (wire::coord(frame[1]), wire::coord(frame[2])) {
            return Command::Debug { row, col };
        }
    }

    if frame == wire::SAVE {
        return Command::Save;
    }
    if frame == wire::ACK {
        return Command::Ack;
    }
    if frame == wire::OK {
        return Command::PeerOk;
    }

    Command::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_commands() {
        assert_eq!(classify(b"AT\r\n"), Command::Handshake);
        assert_eq!(classify(b"C\r\n"), Command::Clear);
        assert_eq!(classify(b"B\r\n"), Command::Break);
        assert_eq!(classify(b"P\r\n"), Command::Play);
        assert_eq!(classify(b"S\r\n"), Command::Save);
        assert_eq!(classify(b"T\r\n"), Command::Ack);
        assert_eq!(classify(b"OK\r\n"), Command::PeerOk);
    }

    #[test]
    fn test_token_match_is_exact() {
        assert_eq!(classify(b"AT\r\nAT\r\n"), Command::Unknown);
        assert_eq!(classify(b"AT \r\n"), Command::Unknown);
        assert_eq!(classify(b"at\r\n"), Command::Unknown);
    }

    #[test]
    fn test_number_frame_is_column_first() {
        // Byte 1 is the column, byte 2 the row.
        assert_eq!(
            classify(b"N12\x07\r\n"),
            Command::Number {
                row: 2,
                col: 1,
                value: 7
            }
        );
    }

    #[test]
    fn test_number_value_is_raw() {
        assert_eq!(
            classify(b"N33\xff\r\n"),
            Command::Number {
                row: 3,
                col: 3,
                value: 255
            }
        );
        // A CR in the value position must not break the shape.
        assert_eq!(
            classify(&[b'N', b'1', b'9', b'\r', b'\r', b'\n']),
            Command::Number {
                row: 9,
                col: 1,
                value: b'\r'
            }
        );
    }

    #[test]
    fn test_number_bad_digits_fall_through() {
        assert_eq!(classify(b"N0a\x05\r\n"), Command::Unknown);
        assert_eq!(classify(b"NA1\x05\r\n"), Command::Unknown);
        assert_eq!(classify(b"N\xff\xff\x05\r\n"), Command::Unknown);
    }

    #[test]
    fn test_number_shape_tolerates_trailing_bytes() {
        assert_eq!(
            classify(b"N45\x01\r\njunk"),
            Command::Number {
                row: 5,
                col: 4,
                value: 1
            }
        );
    }

    #[test]
    fn test_debug_frame_is_row_first() {
        assert_eq!(classify(b"D45\r\n"), Command::Debug { row: 4, col: 5 });
    }

    #[test]
    fn test_debug_bad_digits_fall_through() {
        assert_eq!(classify(b"D0a\r\n"), Command::Unknown);
        assert_eq!(classify(b"Dxx\r\n"), Command::Unknown);
    }

    #[test]
    fn test_done_token_from_peer_is_unknown() {
        // A bare completion token is an output of ours, never a command.
        assert_eq!(classify(b"D\r\n"), Command::Unknown);
    }

    #[test]
    fn test_short_frames_never_panic() {
        for frame in [
            &b""[..],
            b"N",
            b"N1",
            b"N12",
            b"N12\x07",
            b"N12\x07\r",
            b"D",
            b"D4",
            b"D45",
            b"D45\r",
            b"\r\n",
        ] {
            assert_eq!(classify(frame), Command::Unknown);
        }
    }

    #[test]
    fn test_garbage_is_unknown() {
        assert_eq!(classify(b"XYZ\r\n"), Command::Unknown);
        assert_eq!(classify(b"\x00\x01\x02\r\n"), Command::Unknown);
        assert_eq!(classify(b"Q\r\n"), Command::Unknown);
    }
}
