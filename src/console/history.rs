//! Command history with ring buffer
//!
//! Static allocation, 10 entries of one full command line each.
//!
//! Two cursors: `commit_index` is the next slot to write, `browse_index`
//! is the slot currently shown during recall. `browse_index ==
//! commit_index` with nothing recalled means "at the fresh input line".
//!
//! Backward recall stops at the oldest surviving entry. Forward recall is
//! not bounded: it keeps stepping circularly, past the newest entry and
//! into whatever the following slots hold (empty or stale text). Steps
//! taken forward can always be walked back.

use heapless::String;

use super::line_buffer::{LINE_CAPACITY, MAX_LINE_LEN};

/// Number of history entries
pub const HISTORY_SIZE: usize = 10;

/// Command history ring buffer
pub struct HistoryStore<const M: usize = HISTORY_SIZE> {
    /// Ring buffer of command lines
    slots: [String<LINE_CAPACITY>; M],
    /// Next slot to write
    commit_index: usize,
    /// Slot currently displayed
    browse_index: usize,
    /// Net steps from `commit_index`: negative is older, positive is past
    /// the newest entry
    offset: isize,
    /// Lines committed since start (may exceed M)
    count: usize,
}

impl<const M: usize> HistoryStore<M> {
    /// Create empty history
    pub const fn new() -> Self {
        assert!(M > 0, "History needs at least one slot");

        Self {
            slots: [const { String::new() }; M],
            commit_index: 0,
            browse_index: 0,
            offset: 0,
            count: 0,
        }
    }

    /// Store a submitted line and stop browsing.
    ///
    /// Empty lines are ignored. Longer-than-a-line input is cut to fit.
    pub fn commit(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }

        let slot = &mut self.slots[self.commit_index];
        slot.clear();
        let _ = slot.push_str(fit(line));

        self.commit_index = (self.commit_index + 1) % M;
        self.count = self.count.saturating_add(1);
        self.cancel_browse();
    }

    /// Step to the previous (older) entry.
    ///
    /// Returns `None` without moving when history is empty or the oldest
    /// reachable entry is already shown.
    pub fn recall_previous(&mut self) -> Option<&str> {
        if self.count == 0 || self.offset <= -(self.len() as isize) {
            return None;
        }

        self.browse_index = (self.browse_index + M - 1) % M;
        self.offset -= 1;
        Some(self.slots[self.browse_index].as_str())
    }

    /// Step to the next (newer) entry, unconditionally.
    ///
    /// From the fresh input line this wraps to the slot after
    /// `commit_index`, which holds the oldest entry or nothing.
    pub fn recall_next(&mut self) -> &str {
        self.browse_index = (self.browse_index + 1) % M;
        self.offset = self.offset.saturating_add(1);
        self.slots[self.browse_index].as_str()
    }

    /// Back to the fresh input line (Ctrl-C, submit).
    pub fn cancel_browse(&mut self) {
        self.browse_index = self.commit_index;
        self.offset = 0;
    }

    /// Next slot to write
    pub fn commit_index(&self) -> usize {
        self.commit_index
    }

    /// Slot currently displayed
    pub fn browse_index(&self) -> usize {
        self.browse_index
    }

    /// True while a recalled entry is shown
    pub fn is_browsing(&self) -> bool {
        self.offset != 0
    }

    /// Lines committed since start
    pub fn count(&self) -> usize {
        self.count
    }

    /// Entries still held
    pub fn len(&self) -> usize {
        self.count.min(M)
    }

    /// Check if nothing was ever committed
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Raw slot content (empty if never written)
    pub fn slot(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(|s| s.as_str())
    }

    /// Number of slots
    pub const fn capacity(&self) -> usize {
        M
    }
}

impl<const M: usize> Default for HistoryStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Longest prefix of `line` that fits a slot, on a char boundary.
fn fit(line: &str) -> &str {
    if line.len() <= MAX_LINE_LEN {
        return line;
    }
    let mut end = MAX_LINE_LEN;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}
