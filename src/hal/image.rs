//! Fixed register image of an STM32F401 running the console.
//!
//! Used by the hosted simulator and by tests. The default image is a board
//! clocked from an 8 MHz HSE through the PLL to 84 MHz with USART2 on
//! PA2/PA3 at 115200 baud.

use core::cell::Cell;

use super::board::{Board, Peripheral, RegisterBlock, SystemInfo};

/// Board backed by an in-memory register image.
pub struct StaticBoard {
    info: SystemInfo,
    blocks: [RegisterBlock; 7],
    readable: [bool; 7],
    uptime_us: Cell<i64>,
}

fn slot(peripheral: Peripheral) -> usize {
    match peripheral {
        Peripheral::GpioA => 0,
        Peripheral::GpioB => 1,
        Peripheral::GpioC => 2,
        Peripheral::GpioD => 3,
        Peripheral::Usart2 => 4,
        Peripheral::Rcc => 5,
        Peripheral::Tim1 => 6,
    }
}

impl StaticBoard {
    /// Image of a Nucleo-F401RE after startup.
    pub fn stm32f401() -> Self {
        let info = SystemInfo {
            mcu: "STM32F401xE",
            core: "ARM Cortex-M4",
            hal_version: 0x0108_0300,
            device_id: 0x0000_0433,
            revision_id: 0x0000_1000,
            sysclk_hz: 84_000_000,
            hclk_hz: 84_000_000,
            pclk1_hz: 42_000_000,
            pclk2_hz: 84_000_000,
            tick_hz: 1000,
            uptime_ms: 0,
        };

        let blocks = [
            // PA2/PA3 USART2 (AF7), PA5 LED output, PA13/14/15 debug port
            RegisterBlock::from_values(
                Peripheral::GpioA,
                &[
                    0xA800_04A0, 0x0000_0000, 0x0C00_0000, 0x6400_0000, 0x0000_A00C,
                    0x0000_0000, 0x0000_0000, 0x0000_0000, 0x0000_7700, 0x0000_0000,
                ],
            ),
            // PB3/PB4 debug port reset state
            RegisterBlock::from_values(
                Peripheral::GpioB,
                &[
                    0x0000_0280, 0x0000_0000, 0x0000_00C0, 0x0000_0100, 0x0000_0010,
                ],
            ),
            // PC13 user button, input with external pull-up
            RegisterBlock::from_values(
                Peripheral::GpioC,
                &[0x0000_0000, 0x0000_0000, 0x0000_0000, 0x0000_0000, 0x0000_2000],
            ),
            RegisterBlock::zeroed(Peripheral::GpioD),
            RegisterBlock::from_values(
                Peripheral::Usart2,
                &[0x0000_00C0, 0x0000_0000, 0x0000_016D, 0x0000_200C],
            ),
            RegisterBlock::from_values(
                Peripheral::Rcc,
                &[
                    0x0303_0083, 0x2741_5408, 0x0000_100A, 0x0000_0000, 0x0000_0000,
                    0x0000_0000, 0x0000_0000, 0x0000_0000, 0x0040_0007, 0x0000_0000,
                    0x1002_0001, 0x0000_4000,
                ],
            ),
            RegisterBlock::from_values(
                Peripheral::Tim1,
                &[
                    0x0000_0000, 0x0000_0000, 0x0000_0000, 0x0000_0000, 0x0000_0001,
                    0x0000_0000, 0x0000_0000, 0x0000_0000, 0x0000_0000, 0x0000_0000,
                    0x0000_0000, 0x0000_FFFF,
                ],
            ),
        ];

        Self {
            info,
            blocks,
            readable: [true; 7],
            uptime_us: Cell::new(0),
        }
    }

    /// Overwrite one register in the image.
    pub fn set_register(&mut self, peripheral: Peripheral, name: &str, value: u32) -> bool {
        self.blocks[slot(peripheral)].set(name, value)
    }

    /// Make a peripheral unreadable, as on a board without it.
    pub fn without(mut self, peripheral: Peripheral) -> Self {
        self.readable[slot(peripheral)] = false;
        self
    }

    /// Advance the simulated clock.
    pub fn set_uptime_us(&self, uptime_us: i64) {
        self.uptime_us.set(uptime_us);
    }
}

impl Default for StaticBoard {
    fn default() -> Self {
        Self::stm32f401()
    }
}

impl Board for StaticBoard {
    fn system_info(&self) -> SystemInfo {
        SystemInfo {
            uptime_ms: u64::try_from(self.uptime_us.get() / 1000).unwrap_or(0),
            ..self.info
        }
    }

    fn snapshot(&self, peripheral: Peripheral) -> Option<RegisterBlock> {
        let i = slot(peripheral);
        self.readable[i].then_some(self.blocks[i])
    }

    fn uptime_us(&self) -> i64 {
        self.uptime_us.get()
    }
}
