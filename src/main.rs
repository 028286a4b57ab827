//! uart-shell - Main entry point
//!
//! On ESP-IDF: console on UART0, logs on UART1, one polling loop.
//! On a host: stdin stands in for the receive interrupt, stdout for the
//! transmitter and stderr for the log port.

#![cfg_attr(target_os = "espidf", no_std, no_main)]

#[cfg(target_os = "espidf")]
mod firmware {
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::sys as esp_idf_sys;

    use uart_shell::hal::output::TxWriter;
    use uart_shell::hal::uart::{self, ConsoleTx, EspBoard};
    use uart_shell::log_drain::drain_logs;
    use uart_shell::{shell_error, shell_info, ByteQueue, Shell, ShellConfig, SHELL_LOG};

    /// Filled from the UART driver, drained by the loop below.
    static RX_QUEUE: ByteQueue = ByteQueue::new();

    pub fn run() {
        esp_idf_sys::link_patches();

        let config = ShellConfig::DEFAULT;
        let board = EspBoard;
        let now = || unsafe { esp_idf_sys::esp_timer_get_time() };

        let peripherals = match Peripherals::take() {
            Ok(p) => p,
            Err(e) => {
                shell_error!(SHELL_LOG, now(), "peripherals unavailable: {}", e);
                return;
            }
        };
        let pins = peripherals.pins;

        let log_uart = match uart::init_log_uart(peripherals.uart1, pins.gpio6, &config.log_uart) {
            Ok(u) => u,
            Err(e) => {
                shell_error!(SHELL_LOG, now(), "log uart init failed: {}", e);
                return;
            }
        };
        let mut log_out = TxWriter::new(log_uart);

        let console = match uart::init_console_uart(
            peripherals.uart0,
            pins.gpio43,
            pins.gpio44,
            &config.console_uart,
        ) {
            Ok(u) => u,
            Err(e) => {
                shell_error!(SHELL_LOG, now(), "console uart init failed: {}", e);
                drain_logs(&SHELL_LOG, &mut log_out);
                return;
            }
        };
        let mut out = TxWriter::new(ConsoleTx(&console));

        shell_info!(
            SHELL_LOG,
            now(),
            "{} up, heap {} bytes free",
            uart_shell::VERSION,
            uart::free_heap()
        );

        let mut shell = Shell::new(config, &board, &SHELL_LOG);
        shell.start(&mut out);

        loop {
            uart::pump_rx(&console, &RX_QUEUE);
            let handled = shell.poll(&RX_QUEUE, &mut out);
            let logged = drain_logs(&SHELL_LOG, &mut log_out);

            if handled == 0 && logged == 0 {
                unsafe {
                    esp_idf_sys::vTaskDelay(1);
                }
            }
        }
    }
}

#[cfg(target_os = "espidf")]
#[no_mangle]
fn main() {
    firmware::run();
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::{self, Read, Write as _};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    use uart_shell::hal::output::{Transmit, TxWriter};
    use uart_shell::hal::StaticBoard;
    use uart_shell::log_drain::drain_logs;
    use uart_shell::{ByteQueue, Shell, ShellConfig, SHELL_LOG};

    static RX_QUEUE: ByteQueue = ByteQueue::new();
    static INPUT_CLOSED: AtomicBool = AtomicBool::new(false);

    struct StdoutTx;

    impl Transmit for StdoutTx {
        fn transmit(&mut self, bytes: &[u8]) {
            let mut stdout = io::stdout().lock();
            let _ = stdout.write_all(bytes);
            let _ = stdout.flush();
        }
    }

    /// Producer side: one byte at a time, like the receive interrupt.
    fn read_stdin() {
        let mut stdin = io::stdin().lock();
        let mut byte = [0u8; 1];
        while let Ok(1) = stdin.read(&mut byte) {
            // Hold off instead of dropping when a paste outruns the consumer
            while RX_QUEUE.len() == RX_QUEUE.capacity() {
                thread::sleep(Duration::from_millis(1));
            }
            RX_QUEUE.on_byte_received(byte[0]);
        }
        INPUT_CLOSED.store(true, Ordering::Release);
    }

    fn flush_logs() {
        let mut text = String::new();
        drain_logs(&SHELL_LOG, &mut text);
        if !text.is_empty() {
            eprint!("{}", text);
        }
    }

    pub fn run() {
        let board = StaticBoard::stm32f401();
        let started = Instant::now();
        let mut out = TxWriter::new(StdoutTx);

        let mut shell = Shell::new(ShellConfig::DEFAULT, &board, &SHELL_LOG);
        shell.start(&mut out);

        thread::spawn(read_stdin);

        loop {
            board.set_uptime_us(started.elapsed().as_micros() as i64);

            let closed = INPUT_CLOSED.load(Ordering::Acquire);
            let handled = shell.poll(&RX_QUEUE, &mut out);
            flush_logs();

            if handled == 0 {
                if closed && RX_QUEUE.is_empty() {
                    break;
                }
                thread::sleep(Duration::from_millis(5));
            }
        }

        let _ = io::stdout().write_all(b"\r\n");
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    host::run();
}
