//! Lock-free SPSC (Single Producer, Single Consumer) receive queue.
//!
//! Bytes cross the interrupt boundary here and nowhere else.
//!
//! # Architecture
//!
//! ```text
//! UART RX ISR ──────▶ ByteQueue ──────▶ Main loop
//! push()               (lock-free)       pop()
//! O(1), never blocks                     LineEditor::feed
//! ```
//!
//! # Rules
//!
//! - Only the receive interrupt calls `push` / `on_byte_received`
//! - Only the main loop calls `pop` / `clear`
//! - `head` is written by the producer only, `tail` by the consumer only
//! - `count` is the single shared field: the producer increments it after
//!   the slot is written, the consumer decrements it after the slot is read
//! - Queue full: the incoming byte is dropped, never an older one

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Receive queue size.
pub const QUEUE_SIZE: usize = 256;

/// Fixed-capacity circular byte queue fed from interrupt context.
///
/// # Safety
///
/// This type uses `UnsafeCell` internally but is safe to use because:
/// - A slot is written only while it is outside `[tail, tail + count)`
/// - A slot is read only while it is inside that window
/// - The producer publishes a slot with a `Release` increment of `count`,
///   the consumer frees it with a `Release` decrement; both sides read
///   `count` with `Acquire` before touching the slot
pub struct ByteQueue<const N: usize = QUEUE_SIZE> {
    slots: UnsafeCell<[u8; N]>,

    /// Next slot to write (producer-owned).
    head: AtomicUsize,

    /// Next slot to read (consumer-owned).
    tail: AtomicUsize,

    /// Bytes currently buffered.
    count: AtomicUsize,

    /// Bytes dropped because the queue was full (never reset by the queue).
    dropped: AtomicU32,
}

// SAFETY: One producer, one consumer, disjoint index ownership and an
// atomic count as the only shared word.
unsafe impl<const N: usize> Sync for ByteQueue<N> {}
unsafe impl<const N: usize> Send for ByteQueue<N> {}

impl<const N: usize> ByteQueue<N> {
    /// Create an empty queue. Usable in a `static`.
    pub const fn new() -> Self {
        assert!(N > 0, "Queue size must be non-zero");

        Self {
            slots: UnsafeCell::new([0u8; N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            count: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a byte (producer side, interrupt context).
    ///
    /// Returns `true` if the byte was queued, `false` if it was dropped
    /// because the queue is full.
    ///
    /// # Timing
    ///
    /// O(1), never blocks, never allocates.
    #[inline]
    pub fn push(&self, byte: u8) -> bool {
        if self.count.load(Ordering::Acquire) >= N {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let head = self.head.load(Ordering::Relaxed);

        // SAFETY: count < N, so `head` is outside the consumer's window.
        unsafe {
            (*self.slots.get())[head] = byte;
        }

        self.head.store((head + 1) % N, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Release);
        true
    }

    /// Receive-interrupt entry point.
    ///
    /// Safe to call from the UART RX callback: one `push`, result ignored.
    #[inline]
    pub fn on_byte_received(&self, byte: u8) {
        let _ = self.push(byte);
    }

    /// Pop the oldest byte (consumer side, main loop).
    ///
    /// Returns `None` if the queue is empty.
    #[inline]
    pub fn pop(&self) -> Option<u8> {
        if self.count.load(Ordering::Acquire) == 0 {
            return None;
        }

        let tail = self.tail.load(Ordering::Relaxed);

        // SAFETY: count > 0, so `tail` holds a published byte the producer
        // will not touch until count is decremented.
        let byte = unsafe { (*self.slots.get())[tail] };

        self.tail.store((tail + 1) % N, Ordering::Relaxed);
        self.count.fetch_sub(1, Ordering::Release);
        Some(byte)
    }

    /// Number of buffered bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Check if nothing is buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard everything currently buffered (consumer side).
    ///
    /// Implemented as a drain so the producer may keep pushing meanwhile.
    pub fn clear(&self) {
        while self.pop().is_some() {}
    }

    /// Total bytes dropped on overflow since start.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Get the queue capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for ByteQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
