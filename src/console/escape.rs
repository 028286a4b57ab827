//! Arrow-key escape sequence recognizer.
//!
//! Sequences are exactly three bytes: ESC, an introducer, a final byte.
//! Only the final byte is interpreted, so both `ESC [ A` and the
//! application-mode `ESC O A` read as Up.

/// Length of a recognized sequence, ESC included.
pub const ESCAPE_MAX: usize = 3;

/// ESC byte
pub const ESC: u8 = 0x1B;

/// Result of feeding a byte while inside a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeStep {
    /// More bytes needed
    Pending,
    /// Sequence complete; carries the final byte
    Complete(u8),
}

/// Cursor keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowKey {
    Up,
    Down,
    Right,
    Left,
}

impl ArrowKey {
    /// Decode a final byte. Anything else is swallowed by the caller.
    pub fn from_final(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(ArrowKey::Up),
            b'B' => Some(ArrowKey::Down),
            b'C' => Some(ArrowKey::Right),
            b'D' => Some(ArrowKey::Left),
            _ => None,
        }
    }
}

/// In-progress escape sequence.
#[derive(Clone, Copy, Debug)]
pub struct EscapeState {
    seq: [u8; ESCAPE_MAX],
    len: usize,
    active: bool,
}

impl EscapeState {
    pub const fn new() -> Self {
        Self {
            seq: [0; ESCAPE_MAX],
            len: 0,
            active: false,
        }
    }

    /// ESC received: (re)start a sequence.
    pub fn start(&mut self) {
        self.seq[0] = ESC;
        self.len = 1;
        self.active = true;
    }

    /// Currently inside a sequence
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Bytes accumulated so far
    pub fn len(&self) -> usize {
        self.len
    }

    /// Append a byte. On completion the recognizer is back to idle.
    pub fn advance(&mut self, byte: u8) -> EscapeStep {
        if !self.active {
            return EscapeStep::Pending;
        }

        self.seq[self.len] = byte;
        self.len += 1;

        if self.len >= ESCAPE_MAX {
            let final_byte = self.seq[ESCAPE_MAX - 1];
            self.reset();
            return EscapeStep::Complete(final_byte);
        }
        EscapeStep::Pending
    }

    /// Abandon any sequence in progress.
    pub fn reset(&mut self) {
        self.len = 0;
        self.active = false;
    }
}

impl Default for EscapeState {
    fn default() -> Self {
        Self::new()
    }
}
