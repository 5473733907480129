//! Frame reader over the transport's read half.
//!
//! Wraps a raw reader with the assembler and a queue of already-carved
//! frames, so the session pulls one frame at a time while reads stay
//! readiness-driven. There is no polling: between frames the task is
//! parked on the transport.

use std::collections::VecDeque;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{GridwireError, Result};
use crate::protocol::{Frame, FrameAssembler};

/// Yields complete frames from a byte stream in arrival order.
pub struct FrameReader<R> {
    reader: R,
    assembler: FrameAssembler,
    pending: VecDeque<Frame>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Wrap a reader. `max_frame_len` caps pending unterminated bytes,
    /// `read_buf_len` sizes the per-read buffer.
    pub fn new(reader: R, max_frame_len: usize, read_buf_len: usize) -> Self {
        Self {
            reader,
            assembler: FrameAssembler::with_max_frame_len(max_frame_len),
            pending: VecDeque::new(),
            buf: vec![0u8; read_buf_len],
        }
    }

    /// Next frame, waiting for transport data as needed.
    ///
    /// `Ok(None)` means the peer closed the stream. An overflow error
    /// leaves the reader usable; the junk bytes are already gone.
    ///
    /// Cancel safe: a frame is only dequeued on completion, and carved
    /// frames survive in the queue across a dropped call.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(Some(frame));
            }

            let n = match self.reader.read(&mut self.buf).await {
                Ok(0) => return Ok(None),
                Ok(n) => n,
                Err(e) => return Err(GridwireError::Io(e)),
            };

            let frames = self.assembler.push(&self.buf[..n])?;
            self.pending.extend(frames);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::DEFAULT_MAX_FRAME_LEN;
    use tokio::io::{duplex, AsyncWriteExt};

    fn reader_over<R: AsyncRead + Unpin>(r: R) -> FrameReader<R> {
        FrameReader::new(r, DEFAULT_MAX_FRAME_LEN, 1024)
    }

    #[tokio::test]
    async fn test_yields_frames_in_order() {
        let (near, mut far) = duplex(256);
        let mut reader = reader_over(near);

        far.write_all(b"AT\r\nS\r\n").await.unwrap();

        let frame = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.as_bytes(), b"AT\r\n");
        let frame = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.as_bytes(), b"S\r\n");
    }

    #[tokio::test]
    async fn test_reassembles_fragmented_writes() {
        let (near, mut far) = duplex(256);
        let mut reader = reader_over(near);

        let write = tokio::spawn(async move {
            far.write_all(b"N1").await.unwrap();
            far.flush().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            far.write_all(b"2\x07\r\n").await.unwrap();
            far
        });

        let frame = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.as_bytes(), b"N12\x07\r\n");
        drop(write.await.unwrap());
    }

    #[tokio::test]
    async fn test_eof_yields_none() {
        let (near, far) = duplex(256);
        let mut reader = reader_over(near);

        drop(far);
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overflow_surfaces_then_reader_recovers() {
        let (near, mut far) = duplex(1024);
        let mut reader = FrameReader::new(near, 64, 1024);

        far.write_all(&[b'j'; 100]).await.unwrap();
        let result = reader.next_frame().await;
        assert!(matches!(
            result,
            Err(GridwireError::FrameOverflow { dropped: 100 })
        ));

        far.write_all(b"AT\r\n").await.unwrap();
        let frame = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.as_bytes(), b"AT\r\n");
    }
}
