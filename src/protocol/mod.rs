//! Protocol module - wire tokens, framing, and command classification.
//!
//! This module implements the line protocol:
//! - named frame tokens and the Number-frame builder
//! - frame assembler for accumulating partial reads
//! - ordered structural classifier producing [`Command`]s

mod assembler;
mod command;
mod frame;
pub mod wire;

pub use assembler::{FrameAssembler, DEFAULT_MAX_FRAME_LEN};
pub use command::{classify, Command};
pub use frame::Frame;
