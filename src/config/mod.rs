//! Module: config
//!
//! Purpose: Runtime configuration for the console.
//!
//! Architecture:
//! - Buffer sizing is compile-time (`QUEUE_SIZE`, `LINE_CAPACITY`,
//!   `HISTORY_SIZE`, `TX_CHUNK_SIZE`) and lives beside each type
//! - Everything a board bring-up may want to change lives in [`ShellConfig`]
//! - Nothing is persisted; all state resets on restart

use crate::logging::LogLevel;

/// Serial port settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UartConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
    pub rx_pin: Option<u8>,
}

impl UartConfig {
    /// Console port: 115200 8N1 on the default UART0 pins.
    pub const CONSOLE: Self = Self {
        baud_rate: 115200,
        tx_pin: 43,
        rx_pin: Some(44),
    };

    /// TX-only diagnostic log port (external USB-UART adapter).
    pub const LOG: Self = Self {
        baud_rate: 115200,
        tx_pin: 6,
        rx_pin: None,
    };
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::CONSOLE
    }
}

/// Console configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShellConfig {
    /// Printed before every input line.
    pub prompt: &'static str,
    /// Title line of the banner.
    pub banner_title: &'static str,
    /// Initial log level.
    pub log_level: LogLevel,
    pub console_uart: UartConfig,
    pub log_uart: UartConfig,
}

impl ShellConfig {
    pub const DEFAULT: Self = Self {
        prompt: "STM32> ",
        banner_title: "STM32F401 Interactive Shell",
        log_level: LogLevel::Info,
        console_uart: UartConfig::CONSOLE,
        log_uart: UartConfig::LOG,
    };
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
