//! Log stream output.
//!
//! The main loop drains [`LogStream`] entries into any `core::fmt::Write`
//! sink: the TX-only log UART on the firmware, stderr on the host.
//!
//! ```text
//! shell ──push──▶ LogStream ──drain_logs──▶ log UART (GPIO6)
//!                                           └─▶ serial monitor
//! ```

use core::fmt::Write;

use crate::hal::output::SliceWriter;
use crate::logging::{LogEntry, LogStream};

/// Longest formatted line: timestamp, level, message, CRLF.
pub const LOG_LINE_LEN: usize = 160;

/// Format log entry to string.
///
/// Format: `[timestamp_us] LEVEL: message\r\n`
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    let mut writer = SliceWriter::new(buf);

    let _ = write!(
        writer,
        "[{:10}] {}: {}\r\n",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    );

    writer.len()
}

/// Write every pending entry to `out`, then report and reset drops.
///
/// Returns the number of entries written.
pub fn drain_logs<const N: usize>(stream: &LogStream<N>, out: &mut dyn Write) -> usize {
    let mut format_buf = [0u8; LOG_LINE_LEN];
    let mut written = 0;

    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut format_buf);
        if let Ok(line) = core::str::from_utf8(&format_buf[..len]) {
            let _ = out.write_str(line);
        }
        written += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let _ = write!(out, "[WARN] dropped: {} log entries\r\n", dropped);
        stream.reset_dropped();
    }

    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MAX_MSG_LEN};

    fn entry(timestamp_us: i64, level: LogLevel, text: &[u8], len: u8) -> LogEntry {
        let mut msg = [0u8; MAX_MSG_LEN];
        msg[..text.len()].copy_from_slice(text);
        LogEntry {
            timestamp_us,
            level,
            len,
            msg,
        }
    }

    #[test]
    fn test_format_log_entry() {
        let e = entry(1234567, LogLevel::Info, b"Hello world", 11);

        let mut buf = [0u8; 256];
        let len = format_log_entry(&e, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert_eq!(formatted, "[   1234567] INFO: Hello world\r\n");
    }

    #[test]
    fn test_format_truncated_message() {
        // Only the first 5 bytes are part of the message
        let e = entry(999, LogLevel::Error, b"TEST12345X", 5);

        let mut buf = [0u8; 256];
        let len = format_log_entry(&e, &mut buf);

        let formatted = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("TEST1"));
        assert!(!formatted.contains("X"));
    }

    #[test]
    fn test_drain_writes_all_pending() {
        let stream: LogStream<8> = LogStream::new();
        stream.push(10, LogLevel::Info, b"first");
        stream.push(20, LogLevel::Warn, b"second");

        let mut out = std::string::String::new();
        assert_eq!(drain_logs(&stream, &mut out), 2);

        assert_eq!(out, "[        10] INFO: first\r\n[        20] WARN: second\r\n");
        assert_eq!(stream.pending(), 0);
    }

    #[test]
    fn test_drain_reports_and_resets_drops() {
        let stream: LogStream<4> = LogStream::new();
        for i in 0..6 {
            stream.push(i, LogLevel::Info, b"x");
        }
        assert!(stream.dropped() > 0);

        let mut out = std::string::String::new();
        drain_logs(&stream, &mut out);

        assert!(out.contains("dropped: "));
        assert_eq!(stream.dropped(), 0);

        let mut again = std::string::String::new();
        assert_eq!(drain_logs(&stream, &mut again), 0);
        assert!(again.is_empty());
    }
}
