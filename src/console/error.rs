//! Console error types

/// Console error with code and message
///
/// Never leaves the dispatcher: every variant is rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// E01: Unknown command
    UnknownCommand,
    /// E02: Argument outside the command's keyword set
    InvalidArgument,
    /// E03: Peripheral or introspection value not readable on this board
    Unavailable,
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::InvalidArgument => "E02",
            Self::Unavailable => "E03",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::InvalidArgument => "invalid argument",
            Self::Unavailable => "not available on this board",
        }
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
