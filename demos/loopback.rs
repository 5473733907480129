//! Loopback driver - plays the peer role against a live session over an
//! in-memory stream.
//!
//! This demo walks the whole conversation a real peer holds:
//! - handshake and clear
//! - a handful of cell writes with readback
//! - a play round with the delayed done token
//! - a save transfer, acking all 81 cells in lock-step
//!
//! Run with:
//!
//! ```sh
//! cargo run --example loopback
//! ```

use std::error::Error;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

use gridwire::protocol::wire;
use gridwire::{Grid, Session, SessionConfig};

async fn expect(peer: &mut DuplexStream, token: &[u8]) -> Result<(), Box<dyn Error>> {
    let mut buf = vec![0u8; token.len()];
    peer.read_exact(&mut buf).await?;
    if buf != token {
        return Err(format!("expected {:?}, got {:?}", token, buf).into());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let (line, mut peer) = tokio::io::duplex(4096);
    let grid = Grid::default().into_shared();

    // Shorten the play delay so the demo does not dawdle.
    let config = SessionConfig::new().play_delay(Duration::from_millis(500));
    let session = tokio::spawn(Session::with_config(line, grid.clone(), config).run());

    // Probe the endpoint, then clear.
    peer.write_all(wire::HANDSHAKE).await?;
    expect(&mut peer, wire::OK).await?;
    peer.write_all(wire::CLEAR).await?;
    expect(&mut peer, wire::OK).await?;

    // Seed a diagonal of cells. Inbound frames name the column first.
    for n in 1..=9u8 {
        let frame = [b'N', b'0' + n, b'0' + n, n, b'\r', b'\n'];
        peer.write_all(&frame).await?;
        expect(&mut peer, wire::OK).await?;
    }

    // Read one back.
    peer.write_all(b"D33\r\n").await?;
    let mut report = [0u8; 6];
    peer.read_exact(&mut report).await?;
    println!("cell (3,3) reports value {}", report[3]);

    println!("{}", grid.lock().unwrap());

    // A play round: immediate OK, done after the delay.
    peer.write_all(wire::PLAY).await?;
    expect(&mut peer, wire::OK).await?;
    expect(&mut peer, wire::DONE).await?;
    println!("play round finished");

    // Pull the whole board back, acking cell by cell.
    peer.write_all(wire::SAVE).await?;
    let mut transferred = Grid::default();
    for _ in 0..81 {
        let mut cell = [0u8; 6];
        peer.read_exact(&mut cell).await?;
        let row = usize::from(cell[1] - b'1');
        let col = usize::from(cell[2] - b'1');
        transferred.set(row, col, cell[3]);
        peer.write_all(wire::ACK).await?;
    }
    expect(&mut peer, wire::DONE).await?;

    println!("transferred board:");
    println!("{}", transferred);

    drop(peer);
    session.await??;
    Ok(())
}
