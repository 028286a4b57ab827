//! Hardware Abstraction Layer for the console.
//!
//! Thin boundaries around the chip: register introspection and the
//! blocking transmit primitive. Business logic stays in core modules,
//! HAL is just I/O.

pub mod board;
pub mod image;
pub mod output;

#[cfg(target_os = "espidf")]
pub mod uart;

pub use board::{Board, Peripheral, RegisterBlock, SystemInfo};
pub use image::StaticBoard;
pub use output::{Transmit, TxWriter};
