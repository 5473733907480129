//! Dedicated writer task owning the transport's write half.
//!
//! Handlers queue whole reply frames over an mpsc channel; the writer task
//! drains whatever is ready, writes, and flushes once per batch. The flush
//! matters: a serial peer sits on the line waiting for these bytes, and the
//! bounded channel is the only backpressure the protocol tolerates.
//!
//! ```text
//! session loop ─┐
//! save transfer ┼─► mpsc::Sender<Bytes> ─► writer task ─► transport
//! ```

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{GridwireError, Result};

/// Default channel capacity for queued replies.
pub const DEFAULT_REPLY_CAPACITY: usize = 64;

/// Maximum frames drained into a single write batch.
const MAX_BATCH_SIZE: usize = 16;

/// Handle for queueing reply frames to the writer task.
///
/// This is cheaply cloneable.
#[derive(Clone)]
pub struct WriterHandle {
    tx: mpsc::Sender<Bytes>,
}

impl WriterHandle {
    /// Queue one frame, waiting for channel capacity.
    ///
    /// Returns [`GridwireError::ConnectionClosed`] if the writer task is
    /// gone.
    pub async fn send(&self, frame: Bytes) -> Result<()> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| GridwireError::ConnectionClosed)
    }

    /// Queue one of the fixed wire tokens.
    pub async fn send_token(&self, token: &'static [u8]) -> Result<()> {
        self.send(Bytes::from_static(token)).await
    }
}

/// Spawn the writer task and return a handle for queueing frames.
///
/// The task ends cleanly when every handle is dropped, or with an error
/// when the transport write fails.
pub fn spawn_writer_task<W>(writer: W, capacity: usize) -> (WriterHandle, JoinHandle<Result<()>>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);
    let task = tokio::spawn(writer_loop(rx, writer));
    (WriterHandle { tx }, task)
}

/// Main writer loop - receives frames and writes them to the transport.
async fn writer_loop<W>(mut rx: mpsc::Receiver<Bytes>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        // Wait for the first frame, then drain whatever else is ready.
        let first = match rx.recv().await {
            Some(frame) => frame,
            None => return Ok(()),
        };

        let mut batch = Vec::with_capacity(MAX_BATCH_SIZE);
        batch.push(first);
        while batch.len() < MAX_BATCH_SIZE {
            match rx.try_recv() {
                Ok(frame) => batch.push(frame),
                Err(_) => break,
            }
        }

        for frame in &batch {
            writer.write_all(frame).await?;
        }
        writer.flush().await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::wire;
    use tokio::io::{duplex, AsyncReadExt};

    #[tokio::test]
    async fn test_send_writes_frame() {
        let (near, mut far) = duplex(256);
        let (handle, _task) = spawn_writer_task(near, DEFAULT_REPLY_CAPACITY);

        handle.send_token(wire::OK).await.unwrap();

        let mut buf = [0u8; 4];
        far.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"OK\r\n");
    }

    #[tokio::test]
    async fn test_frames_arrive_in_order() {
        let (near, mut far) = duplex(256);
        let (handle, _task) = spawn_writer_task(near, DEFAULT_REPLY_CAPACITY);

        handle.send_token(wire::OK).await.unwrap();
        handle
            .send(Bytes::copy_from_slice(&wire::encode_cell(1, 2, 3)))
            .await
            .unwrap();
        handle.send_token(wire::DONE).await.unwrap();

        let mut buf = [0u8; 4 + 6 + 3];
        far.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf[..4], b"OK\r\n");
        assert_eq!(&buf[4..10], b"N12\x03\r\n");
        assert_eq!(&buf[10..], b"D\r\n");
    }

    #[tokio::test]
    async fn test_writer_shutdown_on_handle_drop() {
        let (near, _far) = duplex(256);
        let (handle, task) = spawn_writer_task(near, DEFAULT_REPLY_CAPACITY);

        drop(handle);

        let result = task.await.unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_after_writer_gone() {
        let (near, _far) = duplex(256);
        let (handle, task) = spawn_writer_task(near, DEFAULT_REPLY_CAPACITY);

        task.abort();
        let _ = task.await;

        let result = handle.send_token(wire::OK).await;
        assert!(matches!(result, Err(GridwireError::ConnectionClosed)));
    }
}
