//! # gridwire
//!
//! Serial-line protocol endpoint for a shared 9x9 grid of byte cells.
//!
//! The crate converses with exactly one peer over one byte stream. Commands
//! are short CRLF-terminated frames: fixed tokens (`AT`, `C`, `B`, `P`,
//! `S`), fixed-shape cell frames (`N`, `D`), and a lock-stepped 81-cell
//! bulk transfer behind the Save command, each cell gated on the peer's
//! ack token.
//!
//! ## Architecture
//!
//! - **Grid store**: the shared 9x9 matrix of raw byte cells
//! - **Protocol**: frame assembly plus the ordered structural classifier
//!   that recovers command identity from frame shape
//! - **Session**: the per-connection dispatch loop, with a writer task
//!   owning the transport's write half
//!
//! ## Example
//!
//! ```no_run
//! use gridwire::{Grid, Session};
//!
//! #[tokio::main]
//! async fn main() -> gridwire::Result<()> {
//!     let port = gridwire::transport::open("/dev/ttyUSB0")?;
//!     let grid = Grid::default().into_shared();
//!
//!     // Serves the peer until it disconnects. The grid handle stays
//!     // observable from outside the session.
//!     Session::new(port, grid).run().await
//! }
//! ```

pub mod error;
pub mod grid;
pub mod protocol;
pub mod session;
pub mod transport;

mod writer;

pub use error::{GridwireError, Result};
pub use grid::{Grid, SharedGrid};
pub use protocol::{classify, Command, Frame};
pub use session::{Session, SessionConfig};
