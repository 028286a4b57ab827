//! # uart-shell
//!
//! Interrupt-fed serial command console with zero heap allocation.
//!
//! ## Architecture
//!
//! Bytes flow one way, through fixed-size static buffers:
//! - The receive interrupt pushes into [`ByteQueue`], never blocks
//! - The main loop drains the queue through the [`Shell`]
//! - [`LineEditor`] edits the line and recalls history
//! - The dispatcher runs leaf commands against a [`hal::board::Board`]
//!
//! Output goes to any `core::fmt::Write`; on hardware that is a
//! [`hal::output::TxWriter`] over the blocking UART transmit.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod hal;
pub mod log_drain;
pub mod logging;
pub mod queue;

/// Firmware version, with git hash.
pub const VERSION: &str = env!("VERSION_STRING");

pub use config::ShellConfig;
pub use console::{ConsoleError, DispatchOutcome, LineEditor, LineOutcome, Shell};
pub use logging::{LogLevel, LogStream, SHELL_LOG};
pub use queue::ByteQueue;
