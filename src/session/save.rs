//! The bulk transfer behind the Save command.
//!
//! Strict lock-step: one cell frame in flight at a time, advancing only on
//! the literal ack token. Anything else received during the wait is
//! discarded without resending the cell. The wait is deadline-bounded per
//! cell so a silent peer surfaces as an error instead of a hang.

use bytes::Bytes;
use tokio::io::AsyncRead;
use tokio::time::{timeout_at, Duration, Instant};
use tracing::{info, warn};

use super::reader::FrameReader;
use crate::error::{GridwireError, Result};
use crate::grid::{lock_grid, SharedGrid, GRID_SIZE};
use crate::protocol::wire;
use crate::writer::WriterHandle;

/// Send all 81 cells in row-major order, each gated on its own ack, then
/// the final Done token.
///
/// On an expired ack wait the rest of the transfer is abandoned and no
/// Done is sent; the error names the stalled cell in one-based wire
/// coordinates.
pub(crate) async fn run_bulk_transfer<R>(
    reader: &mut FrameReader<R>,
    writer: &WriterHandle,
    grid: &SharedGrid,
    ack_timeout: Duration,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    info!("bulk transfer started");

    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let value = lock_grid(grid).get(row, col);
            let cell = wire::encode_cell((row + 1) as u8, (col + 1) as u8, value);
            writer.send(Bytes::copy_from_slice(&cell)).await?;

            await_ack(reader, ack_timeout, row, col).await?;
        }
    }

    writer.send_token(wire::DONE).await?;
    info!("bulk transfer complete");
    Ok(())
}

/// Block until the ack token arrives or the deadline passes.
///
/// The deadline is fixed up front: discarded frames do not extend it.
async fn await_ack<R>(
    reader: &mut FrameReader<R>,
    ack_timeout: Duration,
    row: usize,
    col: usize,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let deadline = Instant::now() + ack_timeout;

    loop {
        let frame = match timeout_at(deadline, reader.next_frame()).await {
            Err(_) => {
                return Err(GridwireError::AckTimeout {
                    row: (row + 1) as u8,
                    col: (col + 1) as u8,
                });
            }
            Ok(Ok(Some(frame))) => frame,
            Ok(Ok(None)) => return Err(GridwireError::ConnectionClosed),
            Ok(Err(GridwireError::FrameOverflow { dropped })) => {
                warn!(dropped, "dropped unterminated input during ack wait");
                continue;
            }
            Ok(Err(e)) => return Err(e),
        };

        if frame.as_bytes() == wire::ACK {
            return Ok(());
        }

        // Wrong frame: drop it and keep waiting. The cell is not resent.
        warn!(?frame, "discarding non-ack during transfer");
    }
}
