//! System introspection boundary.
//!
//! Leaf commands read clocks, ids and raw peripheral registers through
//! [`Board`]; the shell core never touches hardware directly.

/// Peripherals the console can report on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Peripheral {
    GpioA,
    GpioB,
    GpioC,
    GpioD,
    Usart2,
    Rcc,
    Tim1,
}

const GPIO_REGS: &[&str] = &[
    "MODER", "OTYPER", "OSPEEDR", "PUPDR", "IDR", "ODR", "BSRR", "LCKR", "AFR[0]", "AFR[1]",
];

const USART_REGS: &[&str] = &["SR", "DR", "BRR", "CR1", "CR2", "CR3", "GTPR"];

const RCC_REGS: &[&str] = &[
    "CR", "PLLCFGR", "CFGR", "CIR", "AHB1RSTR", "AHB2RSTR", "APB1RSTR", "APB2RSTR", "AHB1ENR",
    "AHB2ENR", "APB1ENR", "APB2ENR",
];

const TIM_REGS: &[&str] = &[
    "CR1", "CR2", "SMCR", "DIER", "SR", "EGR", "CCMR1", "CCMR2", "CCER", "CNT", "PSC", "ARR",
    "CCR1", "CCR2", "CCR3", "CCR4",
];

/// Largest register block (TIM1).
pub const MAX_REGISTERS: usize = 16;

impl Peripheral {
    /// Display name used in report headers.
    pub fn name(self) -> &'static str {
        match self {
            Peripheral::GpioA => "GPIOA",
            Peripheral::GpioB => "GPIOB",
            Peripheral::GpioC => "GPIOC",
            Peripheral::GpioD => "GPIOD",
            Peripheral::Usart2 => "USART2",
            Peripheral::Rcc => "RCC",
            Peripheral::Tim1 => "TIM1",
        }
    }

    /// Register names in bus-offset order.
    pub fn register_names(self) -> &'static [&'static str] {
        match self {
            Peripheral::GpioA | Peripheral::GpioB | Peripheral::GpioC | Peripheral::GpioD => {
                GPIO_REGS
            }
            Peripheral::Usart2 => USART_REGS,
            Peripheral::Rcc => RCC_REGS,
            Peripheral::Tim1 => TIM_REGS,
        }
    }

    /// Port letter for GPIO ports.
    pub fn port_letter(self) -> Option<char> {
        match self {
            Peripheral::GpioA => Some('A'),
            Peripheral::GpioB => Some('B'),
            Peripheral::GpioC => Some('C'),
            Peripheral::GpioD => Some('D'),
            _ => None,
        }
    }
}

/// Point-in-time copy of a peripheral's registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterBlock {
    peripheral: Peripheral,
    values: [u32; MAX_REGISTERS],
}

impl RegisterBlock {
    /// All registers zero.
    pub const fn zeroed(peripheral: Peripheral) -> Self {
        Self {
            peripheral,
            values: [0; MAX_REGISTERS],
        }
    }

    /// Build from values in [`Peripheral::register_names`] order.
    /// Missing trailing values read as zero, extra values are ignored.
    pub fn from_values(peripheral: Peripheral, values: &[u32]) -> Self {
        let mut block = Self::zeroed(peripheral);
        let n = values.len().min(peripheral.register_names().len());
        block.values[..n].copy_from_slice(&values[..n]);
        block
    }

    pub fn peripheral(&self) -> Peripheral {
        self.peripheral
    }

    /// Register value by name. Unknown names read as `None`.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.peripheral
            .register_names()
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }

    /// Register value by name, zero when the name is unknown.
    pub fn reg(&self, name: &str) -> u32 {
        self.get(name).unwrap_or(0)
    }

    /// Overwrite a register by name. Returns `false` for unknown names.
    pub fn set(&mut self, name: &str, value: u32) -> bool {
        match self.peripheral.register_names().iter().position(|n| *n == name) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    /// `(name, value)` pairs in bus-offset order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        self.peripheral
            .register_names()
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

/// Static chip identity plus live clock tree and uptime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemInfo {
    pub mcu: &'static str,
    pub core: &'static str,
    pub hal_version: u32,
    pub device_id: u32,
    pub revision_id: u32,
    pub sysclk_hz: u32,
    pub hclk_hz: u32,
    pub pclk1_hz: u32,
    pub pclk2_hz: u32,
    pub tick_hz: u32,
    pub uptime_ms: u64,
}

/// System/clock introspection supplied by the platform.
///
/// Implementations must not block; the console calls these from the main
/// loop while formatting output.
pub trait Board {
    /// Chip identity and clock frequencies.
    fn system_info(&self) -> SystemInfo;

    /// Snapshot a peripheral's registers, `None` if not readable here.
    fn snapshot(&self, peripheral: Peripheral) -> Option<RegisterBlock>;

    /// Microseconds since boot, used for log timestamps.
    fn uptime_us(&self) -> i64;
}
