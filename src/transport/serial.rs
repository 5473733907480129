//! Serial-port opener.
//!
//! Wraps `tokio-serial` with the line settings the peer expects. The
//! returned stream plugs straight into [`Session::new`].
//!
//! [`Session::new`]: crate::Session::new
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> gridwire::Result<()> {
//! let port = gridwire::transport::open("/dev/ttyUSB0")?;
//! # drop(port); Ok(()) }
//! ```

use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};

use crate::error::Result;

/// Line rate the peer runs at.
pub const DEFAULT_BAUD: u32 = 9_600;

/// Open a serial port at the default 9600 baud.
pub fn open(path: &str) -> Result<SerialStream> {
    open_with_baud(path, DEFAULT_BAUD)
}

/// Open a serial port at a custom baud rate.
///
/// Framing is always 8N1 with no flow control; the wire protocol leaves
/// reliability to the line itself.
pub fn open_with_baud(path: &str, baud: u32) -> Result<SerialStream> {
    let stream = tokio_serial::new(path, baud)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .open_native_async()?;
    Ok(stream)
}
