//! Serial endpoint - serves the protocol on a real port until the peer
//! disconnects.
//!
//! Run with:
//!
//! ```sh
//! cargo run --example serial -- /dev/ttyUSB0
//! ```

use std::error::Error;

use gridwire::{Grid, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());

    let port = gridwire::transport::open(&path)?;
    let grid = Grid::default().into_shared();

    tracing::info!(%path, "serving the grid endpoint");
    Session::new(port, grid).run().await?;
    tracing::info!("peer disconnected");
    Ok(())
}
