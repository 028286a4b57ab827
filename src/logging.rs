//! Non-blocking diagnostic logging for the shell.
//!
//! # Architecture
//!
//! ```text
//! Main loop              LogStream            Log drain
//! ─────────              ─────────            ─────────
//!
//! shell_info!() ──────▶ [L0][L1][L2] ──────▶ log UART / stderr
//! formats on stack        lock-free           blocking ok
//! never blocks            ring buffer
//! ```
//!
//! # Rules
//!
//! - The receive interrupt never logs
//! - Pushing never blocks; messages are dropped (and counted) when full
//! - Entries above the stream's level are discarded before formatting

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 120;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Convert from raw u8 value (out of range saturates to Trace).
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timestamp in microseconds since boot.
    pub timestamp_us: i64,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text.
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Lock-free log stream (single producer, single consumer).
///
/// - The main loop pushes while handling input
/// - The drain runs between polls, or on another core, at leisure
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
    level: AtomicU8,
}

// SAFETY: Single producer, single consumer; a slot is published by the
// Release store of write_idx and freed by the Release store of read_idx.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream at `Info` level.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Set the most verbose level that is still recorded.
    #[inline]
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Current level.
    #[inline]
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Check whether an entry at `level` would be recorded.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level()
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if message was queued, `false` if filtered or dropped.
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        if !self.enabled(level) {
            return false;
        }

        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;

        // SAFETY: Single producer; slot is outside [read, write).
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Drain next log entry.
    ///
    /// Returns `None` if no entries available.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // SAFETY: Single consumer, slot published by write_idx.
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Get number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide stream for firmware entry points.
pub static SHELL_LOG: LogStream = LogStream::new();

/// Format a message into a buffer, truncating at the end of `buf`.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = crate::hal::output::SliceWriter::new(buf);
    let _ = core::fmt::write(&mut writer, args);
    writer.len()
}

/// Log macro.
///
/// # Example
///
/// ```ignore
/// shell_log!(LogLevel::Info, log, board.uptime_us(), "dispatch {}", name);
/// ```
#[macro_export]
macro_rules! shell_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let level = $level;
        if $stream.enabled(level) {
            let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
            let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
            $stream.push($timestamp, level, &buf[..len]);
        }
    }};
}

/// Info log.
#[macro_export]
macro_rules! shell_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::shell_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// Warning log.
#[macro_export]
macro_rules! shell_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::shell_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// Error log.
#[macro_export]
macro_rules! shell_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::shell_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// Debug log.
#[macro_export]
macro_rules! shell_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::shell_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

/// Trace log (maximum verbosity).
#[macro_export]
macro_rules! shell_trace {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::shell_log!($crate::logging::LogLevel::Trace, $stream, $timestamp, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_basic() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(1000, LogLevel::Info, b"test message"));
        assert_eq!(stream.pending(), 1);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.timestamp_us, 1000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message(), "test message");

        assert!(stream.drain().is_none());
    }

    #[test]
    fn test_log_stream_full() {
        let stream = LogStream::<4>::new();

        assert!(stream.push(1, LogLevel::Info, b"1"));
        assert!(stream.push(2, LogLevel::Info, b"2"));
        assert!(stream.push(3, LogLevel::Info, b"3"));
        assert!(stream.push(4, LogLevel::Info, b"4"));

        // Should drop
        assert!(!stream.push(5, LogLevel::Info, b"5"));
        assert_eq!(stream.dropped(), 1);

        // Drain one, should be able to push again
        stream.drain();
        assert!(stream.push(6, LogLevel::Info, b"6"));
    }

    #[test]
    fn test_log_level_filter() {
        let stream = LogStream::<8>::new();

        assert!(!stream.push(0, LogLevel::Debug, b"hidden"));
        assert_eq!(stream.pending(), 0);
        assert_eq!(stream.dropped(), 0);

        stream.set_level(LogLevel::Trace);
        assert!(stream.push(0, LogLevel::Debug, b"shown"));

        stream.set_level(LogLevel::Error);
        crate::shell_warn!(stream, 7, "queue overflow: {} bytes", 3);
        crate::shell_error!(stream, 8, "fatal {}", "nothing");
        assert_eq!(stream.pending(), 2);
    }

    #[test]
    fn test_format_to_buffer_truncates() {
        let mut buf = [0u8; 8];
        let len = format_to_buffer(&mut buf, format_args!("Hello {}", 4242));
        assert_eq!(&buf[..len], b"Hello 42");
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_log_stream_threaded_drain() {
        use std::sync::Arc;
        use std::thread;

        let stream = Arc::new(LogStream::<64>::new());
        let producer = {
            let stream = Arc::clone(&stream);
            thread::spawn(move || {
                for i in 0..500 {
                    let msg = format!("msg {}", i);
                    while !stream.push(i, LogLevel::Info, msg.as_bytes()) {
                        thread::yield_now();
                    }
                }
            })
        };

        let mut next = 0i64;
        while next < 500 {
            if let Some(entry) = stream.drain() {
                assert_eq!(entry.timestamp_us, next);
                next += 1;
            }
        }
        producer.join().unwrap();
    }
}
