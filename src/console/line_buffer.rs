//! Line buffer for console input
//!
//! Fixed 124-byte storage with a cursor. The last slot is never filled so
//! `cursor <= len < LINE_CAPACITY` always holds.

/// Line buffer size, terminator slot included.
pub const LINE_CAPACITY: usize = 124;

/// Most characters a line can hold.
pub const MAX_LINE_LEN: usize = LINE_CAPACITY - 1;

/// Command line being edited.
#[derive(Clone)]
pub struct CommandLine {
    buf: [u8; LINE_CAPACITY],
    len: usize,
    cursor: usize,
}

impl CommandLine {
    /// Create empty line
    pub const fn new() -> Self {
        Self {
            buf: [0u8; LINE_CAPACITY],
            len: 0,
            cursor: 0,
        }
    }

    /// Write a character at the cursor and advance.
    ///
    /// Overwrites whatever is under the cursor; trailing text is never
    /// shifted. Returns `false` (and changes nothing) when the line is full
    /// or the byte is not printable ASCII.
    pub fn insert(&mut self, c: u8) -> bool {
        if self.cursor >= MAX_LINE_LEN || !(0x20..=0x7E).contains(&c) {
            return false;
        }
        self.buf[self.cursor] = c;
        self.cursor += 1;
        self.len = self.len.max(self.cursor);
        true
    }

    /// Remove the character before the cursor.
    ///
    /// At the end of the line this shortens it. Mid-line the character is
    /// blanked in place, matching the `\b \b` the terminal shows.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        if self.cursor + 1 == self.len {
            self.len = self.cursor;
        } else {
            self.buf[self.cursor] = b' ';
        }
        true
    }

    /// Move cursor one position left.
    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Move cursor one position right, up to the end of the text.
    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.len {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.len = 0;
        self.cursor = 0;
    }

    /// Replace contents, cursor at the end.
    ///
    /// Non-printable bytes are dropped and the text is cut at
    /// [`MAX_LINE_LEN`].
    pub fn set(&mut self, s: &str) {
        self.clear();
        for &c in s.as_bytes() {
            if !self.insert(c) && self.cursor >= MAX_LINE_LEN {
                break;
            }
        }
    }

    /// Whole text, `[0, len)`.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Text that a submission takes: everything before the cursor.
    pub fn text_to_cursor(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.cursor]).unwrap_or("")
    }

    /// Get buffer length
    pub fn len(&self) -> usize {
        self.len
    }

    /// Cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for CommandLine {
    fn default() -> Self {
        Self::new()
    }
}
