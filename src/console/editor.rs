//! Line editor: turns input bytes into edited command lines.
//!
//! One byte in, at most one outcome out. Terminal feedback (echo, visual
//! backspace, cursor moves, recalled text) is written to `out` as the byte
//! is consumed.

use core::fmt::Write;

use heapless::String;

use super::escape::{ArrowKey, EscapeState, EscapeStep, ESC};
use super::history::HistoryStore;
use super::line_buffer::{CommandLine, LINE_CAPACITY};

/// Ctrl+C
pub const CTRL_C: u8 = 0x03;
/// Backspace (Ctrl+H)
pub const BACKSPACE: u8 = 0x08;
/// DEL, sent by most terminals for the backspace key
pub const DELETE: u8 = 0x7F;

/// Visual backspace: back, blank, back.
const ERASE: &str = "\x08 \x08";
const CURSOR_RIGHT: &str = "\x1b[C";
const CURSOR_LEFT: &str = "\x1b[D";

/// What a single byte produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome<'a> {
    /// Byte consumed, line still being edited
    Continue,
    /// Newline on an empty line; nothing to run, prompt again
    Blank,
    /// Newline on a non-empty line; already committed to history
    Submitted(&'a str),
}

impl<'a> LineOutcome<'a> {
    /// Submitted text, if any
    pub fn submitted(&self) -> Option<&'a str> {
        match self {
            LineOutcome::Submitted(text) => Some(text),
            _ => None,
        }
    }
}

/// Line editor state machine
pub struct LineEditor {
    line: CommandLine,
    escape: EscapeState,
    history: HistoryStore,
    /// Copy of the last submitted line, borrowed by `LineOutcome::Submitted`
    submitted: String<LINE_CAPACITY>,
    prompt: &'static str,
}

impl LineEditor {
    /// Create editor with empty line and history
    pub const fn new(prompt: &'static str) -> Self {
        Self {
            line: CommandLine::new(),
            escape: EscapeState::new(),
            history: HistoryStore::new(),
            submitted: String::new(),
            prompt,
        }
    }

    /// Process a single input byte
    pub fn feed(&mut self, byte: u8, out: &mut dyn Write) -> LineOutcome<'_> {
        // Ctrl+C wins over everything, including a half-read escape
        if byte == CTRL_C {
            let _ = write!(out, "^C\r\n");
            self.reset();
            self.print_prompt(out);
            return LineOutcome::Continue;
        }

        if byte == ESC {
            self.escape.start();
            return LineOutcome::Continue;
        }

        if self.escape.is_active() {
            if let EscapeStep::Complete(final_byte) = self.escape.advance(byte) {
                if let Some(key) = ArrowKey::from_final(final_byte) {
                    self.handle_arrow(key, out);
                }
            }
            return LineOutcome::Continue;
        }

        match byte {
            BACKSPACE | DELETE => {
                if self.line.backspace() {
                    let _ = out.write_str(ERASE);
                }
                LineOutcome::Continue
            }

            b'\n' => {
                let _ = out.write_str("\r\n");

                if self.line.cursor() == 0 {
                    self.line.clear();
                    return LineOutcome::Blank;
                }

                self.submitted.clear();
                let _ = self.submitted.push_str(self.line.text_to_cursor());
                self.history.commit(&self.submitted);
                self.line.clear();
                LineOutcome::Submitted(self.submitted.as_str())
            }

            0x20..=0x7E => {
                if self.line.insert(byte) {
                    let _ = out.write_char(byte as char);
                }
                LineOutcome::Continue
            }

            _ => LineOutcome::Continue,
        }
    }

    fn handle_arrow(&mut self, key: ArrowKey, out: &mut dyn Write) {
        match key {
            ArrowKey::Up => {
                let cursor = self.line.cursor();
                if let Some(prev) = self.history.recall_previous() {
                    erase(cursor, out);
                    let _ = out.write_str(prev);
                    self.line.set(prev);
                }
            }
            ArrowKey::Down => {
                erase(self.line.cursor(), out);
                let next = self.history.recall_next();
                let _ = out.write_str(next);
                self.line.set(next);
            }
            ArrowKey::Right => {
                if self.line.move_right() {
                    let _ = out.write_str(CURSOR_RIGHT);
                }
            }
            ArrowKey::Left => {
                if self.line.move_left() {
                    let _ = out.write_str(CURSOR_LEFT);
                }
            }
        }
    }

    /// Drop the current line, any partial escape and any recall in progress.
    pub fn reset(&mut self) {
        self.line.clear();
        self.escape.reset();
        self.history.cancel_browse();
    }

    /// Print the prompt
    pub fn print_prompt(&self, out: &mut dyn Write) {
        let _ = out.write_str(self.prompt);
    }

    /// Line being edited
    pub fn line(&self) -> &CommandLine {
        &self.line
    }

    /// Command history
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Escape recognizer state
    pub fn escape(&self) -> &EscapeState {
        &self.escape
    }

    pub fn prompt(&self) -> &'static str {
        self.prompt
    }
}

/// Walk the terminal cursor back to column zero of the input, blanking.
fn erase(count: usize, out: &mut dyn Write) {
    for _ in 0..count {
        let _ = out.write_str(ERASE);
    }
}
