//! Output boundary: the blocking "transmit bytes" primitive.
//!
//! The shell formats with `core::fmt::Write`; [`TxWriter`] turns that into
//! transmit calls of at most [`TX_CHUNK_SIZE`] bytes.

use core::fmt::{self, Write};

/// Largest single transmit call (size of the print buffer).
pub const TX_CHUNK_SIZE: usize = 256;

/// Blocking byte transmitter supplied by the driver layer.
///
/// Never called from interrupt context.
pub trait Transmit {
    /// Send all of `bytes`, blocking until they are queued in hardware.
    fn transmit(&mut self, bytes: &[u8]);
}

impl<T: Transmit + ?Sized> Transmit for &mut T {
    fn transmit(&mut self, bytes: &[u8]) {
        (**self).transmit(bytes)
    }
}

/// `core::fmt::Write` adapter over a [`Transmit`].
pub struct TxWriter<T: Transmit> {
    tx: T,
}

impl<T: Transmit> TxWriter<T> {
    pub fn new(tx: T) -> Self {
        Self { tx }
    }

    /// Give the transmitter back.
    pub fn into_inner(self) -> T {
        self.tx
    }
}

impl<T: Transmit> Write for TxWriter<T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for chunk in s.as_bytes().chunks(TX_CHUNK_SIZE) {
            self.tx.transmit(chunk);
        }
        Ok(())
    }
}

/// Formatter into a caller-provided slice; silently truncates when full.
pub struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    /// Written bytes as text. Truncation may split a multi-byte char;
    /// in that case the valid prefix is returned.
    pub fn as_str(&self) -> &str {
        match core::str::from_utf8(&self.buf[..self.pos]) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&self.buf[..e.valid_up_to()]).unwrap_or(""),
        }
    }
}

impl<'a> Write for SliceWriter<'a> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}
