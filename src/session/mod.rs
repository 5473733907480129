//! Session loop and command dispatch.
//!
//! A [`Session`] owns one transport conversation with one peer: frames are
//! pulled off the line, classified, and handled one at a time. Handlers
//! are awaited inline, so Play's delayed Done and the Save transfer's
//! lock-step hold later frames back exactly as the wire contract expects.
//!
//! # Example
//!
//! ```
//! use gridwire::{Grid, Session, SessionConfig};
//! use std::time::Duration;
//!
//! # async fn demo() -> gridwire::Result<()> {
//! let (line, peer) = tokio::io::duplex(256);
//! let grid = Grid::default().into_shared();
//!
//! let config = SessionConfig::new().ack_timeout(Duration::from_secs(2));
//! let session = Session::with_config(line, grid.clone(), config);
//! tokio::spawn(session.run());
//! # drop(peer); Ok(()) }
//! ```

mod reader;
mod save;

pub use reader::FrameReader;

use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::sleep;
use tracing::{debug, trace, warn};

use crate::error::{GridwireError, Result};
use crate::grid::{lock_grid, SharedGrid};
use crate::protocol::{wire, Command, DEFAULT_MAX_FRAME_LEN};
use crate::writer::{spawn_writer_task, WriterHandle, DEFAULT_REPLY_CAPACITY};

/// Default deadline for each bulk-transfer cell acknowledgement.
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Default pause between Play's OK and its Done.
pub const DEFAULT_PLAY_DELAY: Duration = Duration::from_secs(2);

/// Default transport read buffer length.
pub const DEFAULT_READ_BUF_LEN: usize = 1024;

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Deadline for each bulk-transfer cell acknowledgement.
    pub ack_timeout: Duration,
    /// Pause between Play's OK and its Done.
    pub play_delay: Duration,
    /// Cap on pending unterminated input bytes.
    pub max_frame_len: usize,
    /// Transport read buffer length.
    pub read_buf_len: usize,
    /// Reply channel capacity.
    pub reply_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ack_timeout: DEFAULT_ACK_TIMEOUT,
            play_delay: DEFAULT_PLAY_DELAY,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            read_buf_len: DEFAULT_READ_BUF_LEN,
            reply_capacity: DEFAULT_REPLY_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-cell acknowledgement deadline.
    pub fn ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = timeout;
        self
    }

    /// Set the pause between Play's OK and its Done.
    pub fn play_delay(mut self, delay: Duration) -> Self {
        self.play_delay = delay;
        self
    }

    /// Set the cap on pending unterminated input bytes.
    pub fn max_frame_len(mut self, len: usize) -> Self {
        self.max_frame_len = len;
        self
    }

    /// Set the transport read buffer length.
    pub fn read_buf_len(mut self, len: usize) -> Self {
        self.read_buf_len = len;
        self
    }

    /// Set the reply channel capacity.
    pub fn reply_capacity(mut self, capacity: usize) -> Self {
        self.reply_capacity = capacity;
        self
    }
}

/// One protocol conversation over one transport.
pub struct Session<T> {
    transport: T,
    grid: SharedGrid,
    config: SessionConfig,
}

impl<T> Session<T>
where
    T: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    /// Create a session with default configuration.
    pub fn new(transport: T, grid: SharedGrid) -> Self {
        Self::with_config(transport, grid, SessionConfig::default())
    }

    /// Create a session with explicit configuration.
    pub fn with_config(transport: T, grid: SharedGrid, config: SessionConfig) -> Self {
        Self {
            transport,
            grid,
            config,
        }
    }

    /// A clone of the shared grid handle.
    pub fn grid(&self) -> SharedGrid {
        self.grid.clone()
    }

    /// Serve the peer until it closes the stream or the transport fails.
    ///
    /// A clean peer close ends with `Ok(())`. Malformed input never ends
    /// the session; neither does an abandoned bulk transfer.
    pub async fn run(self) -> Result<()> {
        let Session {
            transport,
            grid,
            config,
        } = self;

        let (read_half, write_half) = tokio::io::split(transport);
        let (writer, writer_task) = spawn_writer_task(write_half, config.reply_capacity);
        let mut reader = FrameReader::new(read_half, config.max_frame_len, config.read_buf_len);

        let served = serve(&mut reader, &writer, &grid, &config).await;

        // Dropping the handle lets the writer drain queued replies and
        // exit. A write failure is the root cause of anything the dispatch
        // loop saw after it, so it wins.
        drop(writer);
        match writer_task.await {
            Ok(flushed) => flushed.and(served),
            Err(_) => served,
        }
    }
}

/// The dispatch loop: next frame, classify, handle, forever.
async fn serve<R>(
    reader: &mut FrameReader<R>,
    writer: &WriterHandle,
    grid: &SharedGrid,
    config: &SessionConfig,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    loop {
        let frame = match reader.next_frame().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                debug!("peer closed the stream");
                return Ok(());
            }
            Err(GridwireError::FrameOverflow { dropped }) => {
                warn!(dropped, "dropped unterminated input");
                continue;
            }
            Err(e) => return Err(e),
        };

        trace!(?frame, "frame received");
        let command = frame.command();
        debug!(?command, "dispatching");

        match command {
            Command::Handshake => writer.send_token(wire::OK).await?,
            Command::Clear => {
                // Deliberate no-op on the grid: the wire contract is the
                // OK alone, and the peer resends cell state afterwards.
                // Do not add a wipe here.
                writer.send_token(wire::OK).await?;
            }
            Command::Break => writer.send_token(wire::OK).await?,
            Command::Play => {
                writer.send_token(wire::OK).await?;
                sleep(config.play_delay).await;
                writer.send_token(wire::DONE).await?;
            }
            Command::Number { row, col, value } => {
                lock_grid(grid).set(usize::from(row - 1), usize::from(col - 1), value);
                writer.send_token(wire::OK).await?;
            }
            Command::Debug { row, col } => {
                let value = lock_grid(grid).get(usize::from(row - 1), usize::from(col - 1));
                let report = wire::encode_cell(row, col, value);
                writer.send(Bytes::copy_from_slice(&report)).await?;
            }
            Command::Save => {
                match save::run_bulk_transfer(reader, writer, grid, config.ack_timeout).await {
                    Ok(()) => {}
                    Err(GridwireError::AckTimeout { row, col }) => {
                        warn!(row, col, "bulk transfer abandoned, cell never acked");
                    }
                    Err(GridwireError::ConnectionClosed) => {
                        debug!("peer closed during bulk transfer");
                        return Ok(());
                    }
                    Err(e) => return Err(e),
                }
            }
            Command::Ack => debug!("stray ack outside a transfer"),
            Command::PeerOk => debug!("peer acknowledged"),
            Command::Unknown => debug!("unclassified frame dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

    #[test]
    fn test_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.ack_timeout, DEFAULT_ACK_TIMEOUT);
        assert_eq!(config.play_delay, DEFAULT_PLAY_DELAY);
        assert_eq!(config.max_frame_len, DEFAULT_MAX_FRAME_LEN);
        assert_eq!(config.read_buf_len, DEFAULT_READ_BUF_LEN);
        assert_eq!(config.reply_capacity, DEFAULT_REPLY_CAPACITY);
    }

    #[test]
    fn test_config_fluent_setters() {
        let config = SessionConfig::new()
            .ack_timeout(Duration::from_millis(50))
            .play_delay(Duration::from_millis(10))
            .max_frame_len(64)
            .read_buf_len(128)
            .reply_capacity(8);

        assert_eq!(config.ack_timeout, Duration::from_millis(50));
        assert_eq!(config.play_delay, Duration::from_millis(10));
        assert_eq!(config.max_frame_len, 64);
        assert_eq!(config.read_buf_len, 128);
        assert_eq!(config.reply_capacity, 8);
    }

    #[tokio::test]
    async fn test_handshake_roundtrip() {
        let (line, mut peer) = duplex(256);
        let grid = Grid::default().into_shared();
        let session = tokio::spawn(Session::new(line, grid).run());

        peer.write_all(b"AT\r\n").await.unwrap();
        let mut reply = [0u8; 4];
        peer.read_exact(&mut reply).await.unwrap();
        assert_eq!(&reply, b"OK\r\n");

        drop(peer);
        session.await.unwrap().unwrap();
    }
}
