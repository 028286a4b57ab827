//! Console session: editor, dispatcher and log wiring.
//!
//! Single consumer. The main loop owns the `Shell` and calls [`Shell::poll`]
//! with the queue the receive interrupt fills.

use core::fmt::Write;

use super::commands::CLEAR_SCREEN;
use super::dispatcher::{self, DispatchOutcome};
use super::editor::{LineEditor, LineOutcome};
use crate::config::ShellConfig;
use crate::hal::board::Board;
use crate::logging::LogStream;
use crate::queue::ByteQueue;
use crate::{shell_debug, shell_info, shell_warn};

const BANNER_RULE: &str = "========================================";

/// One interactive session.
pub struct Shell<'a> {
    editor: LineEditor,
    board: &'a dyn Board,
    log: &'a LogStream,
    config: ShellConfig,
    /// Queue drop counter value already reported
    reported_drops: u32,
}

impl<'a> Shell<'a> {
    pub fn new(config: ShellConfig, board: &'a dyn Board, log: &'a LogStream) -> Self {
        log.set_level(config.log_level);
        Self {
            editor: LineEditor::new(config.prompt),
            board,
            log,
            config,
            reported_drops: 0,
        }
    }

    /// Print banner and first prompt.
    pub fn start(&mut self, out: &mut dyn Write) {
        self.print_banner(out);
        self.editor.print_prompt(out);
    }

    /// Clear the screen and start over. History survives.
    pub fn reset(&mut self, out: &mut dyn Write) {
        let _ = out.write_str(CLEAR_SCREEN);
        self.editor.reset();
        shell_info!(self.log, self.board.uptime_us(), "session reset");
        self.start(out);
    }

    /// Feed one byte. Returns the dispatch outcome when a line was submitted.
    pub fn feed(&mut self, byte: u8, out: &mut dyn Write) -> Option<DispatchOutcome> {
        match self.editor.feed(byte, out) {
            LineOutcome::Continue => None,
            LineOutcome::Blank => {
                self.editor.print_prompt(out);
                None
            }
            LineOutcome::Submitted(text) => {
                let now = self.board.uptime_us();
                shell_debug!(self.log, now, "dispatch: {}", text);

                let outcome = dispatcher::dispatch(text, self.board, out);
                if outcome == DispatchOutcome::Unknown {
                    shell_warn!(self.log, now, "unknown command: {}", text);
                }

                self.editor.print_prompt(out);
                Some(outcome)
            }
        }
    }

    /// Drain every byte currently queued. Returns how many were processed.
    pub fn poll<const N: usize>(&mut self, queue: &ByteQueue<N>, out: &mut dyn Write) -> usize {
        let dropped = queue.dropped();
        let lost = dropped.wrapping_sub(self.reported_drops);
        if lost != 0 {
            shell_warn!(self.log, self.board.uptime_us(), "rx overflow: {} bytes dropped", lost);
            self.reported_drops = dropped;
        }

        let mut processed = 0;
        while let Some(byte) = queue.pop() {
            self.feed(byte, out);
            processed += 1;
        }
        processed
    }

    fn print_banner(&self, out: &mut dyn Write) {
        let _ = write!(
            out,
            "\r\n{rule}\r\n  {}\r\n  {}\r\n  Type 'help' for available commands\r\n{rule}\r\n\r\n",
            self.config.banner_title,
            crate::VERSION,
            rule = BANNER_RULE
        );
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }
}
