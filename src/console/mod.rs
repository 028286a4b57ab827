//! Serial console: line editing, history and command dispatch.
//!
//! Lazy polling from the main loop - no dedicated task.
//! Zero heap allocation - all static buffers.

pub mod commands;
pub mod dispatcher;
pub mod editor;
pub mod error;
pub mod escape;
pub mod history;
pub mod line_buffer;
pub mod shell;

pub use dispatcher::{command_names, dispatch, DispatchOutcome, COMMANDS};
pub use editor::{LineEditor, LineOutcome};
pub use error::ConsoleError;
pub use history::HistoryStore;
pub use line_buffer::CommandLine;
pub use shell::Shell;
