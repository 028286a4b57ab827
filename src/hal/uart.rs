//! ESP-IDF UART binding.
//!
//! Console on UART0 (GPIO43 TX / GPIO44 RX), logs on UART1 TX-only
//! (GPIO6). Requires an external USB-UART adapter for the log port.
//!
//! ```text
//! USB-UART TX ──▶ GPIO44 ──pump_rx──▶ ByteQueue ──▶ Shell
//! Shell ──TxWriter<ConsoleTx>──▶ GPIO43 ──▶ USB-UART RX
//! LogStream ──drain_logs──▶ GPIO6 ──▶ serial monitor
//! ```

use esp_idf_svc::hal::delay::NON_BLOCK;
use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartDriver, UartTxDriver};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::EspError;

use super::board::{Board, Peripheral as Target, RegisterBlock, SystemInfo};
use super::output::Transmit;
use crate::config::UartConfig;
use crate::queue::ByteQueue;

/// Initialize the console UART (TX + RX, no flow control).
pub fn init_console_uart<'d, U: uart::Uart>(
    uart: impl Peripheral<P = U> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
    config: &UartConfig,
) -> Result<UartDriver<'d>, EspError> {
    let uart_config = uart::config::Config::default().baudrate(Hertz(config.baud_rate));

    UartDriver::new(
        uart,
        tx_pin,
        rx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// Initialize a TX-only UART for logging output.
pub fn init_log_uart<'d, U: uart::Uart>(
    uart: impl Peripheral<P = U> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartConfig,
) -> Result<UartTxDriver<'d>, EspError> {
    let uart_config = uart::config::Config::default().baudrate(Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// Blocking transmit on the console UART.
pub struct ConsoleTx<'a, 'd>(pub &'a UartDriver<'d>);

impl Transmit for ConsoleTx<'_, '_> {
    fn transmit(&mut self, bytes: &[u8]) {
        let mut rest = bytes;
        while !rest.is_empty() {
            match self.0.write(rest) {
                Ok(0) | Err(_) => break,
                Ok(n) => rest = &rest[n..],
            }
        }
    }
}

impl Transmit for UartTxDriver<'_> {
    fn transmit(&mut self, bytes: &[u8]) {
        let _ = self.write(bytes);
    }
}

/// Move whatever the UART driver has received into the queue.
///
/// The driver's RX interrupt fills its ring; this hands bytes over one by
/// one through the same path a bare-metal receive ISR would use.
/// Returns the number of bytes moved.
pub fn pump_rx<const N: usize>(uart: &UartDriver<'_>, queue: &ByteQueue<N>) -> usize {
    let mut buf = [0u8; 64];
    let mut moved = 0;

    loop {
        match uart.read(&mut buf, NON_BLOCK) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                for &byte in &buf[..n] {
                    queue.on_byte_received(byte);
                }
                moved += n;
            }
        }
    }

    moved
}

/// Free heap in bytes.
pub fn free_heap() -> u32 {
    unsafe { esp_idf_svc::sys::esp_get_free_heap_size() }
}

/// Board backed by ESP-IDF. STM32 register snapshots are not available.
pub struct EspBoard;

impl Board for EspBoard {
    fn system_info(&self) -> SystemInfo {
        SystemInfo {
            mcu: "ESP32-S3",
            core: "Xtensa LX7",
            hal_version: 0,
            device_id: 0,
            revision_id: 0,
            sysclk_hz: 240_000_000,
            hclk_hz: 240_000_000,
            pclk1_hz: 80_000_000,
            pclk2_hz: 80_000_000,
            tick_hz: esp_idf_svc::sys::configTICK_RATE_HZ,
            uptime_ms: u64::try_from(self.uptime_us() / 1000).unwrap_or(0),
        }
    }

    fn snapshot(&self, _peripheral: Target) -> Option<RegisterBlock> {
        None
    }

    fn uptime_us(&self) -> i64 {
        unsafe { esp_idf_svc::sys::esp_timer_get_time() }
    }
}
