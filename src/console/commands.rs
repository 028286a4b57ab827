//! Command handlers
//!
//! Leaf formatting only: each handler reads what it needs from the
//! [`Board`] and writes `\r\n`-terminated text. None of them block.

use core::fmt::Write;

use super::dispatcher::COMMANDS;
use super::ConsoleError;
use crate::hal::board::{Board, Peripheral, RegisterBlock};

const RULE: &str = "===============================================";
const WIDE_RULE: &str = "=====================================================";
const THIN_RULE: &str = "-----------------------------------------------";

/// Clear screen and home the cursor
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// `status` targets; matched case-insensitively.
const STATUS_TARGETS: &[(&str, Peripheral)] = &[
    ("gpioa", Peripheral::GpioA),
    ("gpiob", Peripheral::GpioB),
    ("gpioc", Peripheral::GpioC),
    ("gpiod", Peripheral::GpioD),
    ("uart2", Peripheral::Usart2),
    ("rcc", Peripheral::Rcc),
    ("timer1", Peripheral::Tim1),
];

/// `showreg` targets; lowercase only.
const SHOWREG_TARGETS: &[(&str, Peripheral)] = &[
    ("uart2", Peripheral::Usart2),
    ("gpioa", Peripheral::GpioA),
    ("rcc", Peripheral::Rcc),
    ("timer1", Peripheral::Tim1),
];

/// Resolve a `status` argument.
pub fn status_target(arg: &str) -> Option<Peripheral> {
    STATUS_TARGETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(arg))
        .map(|(_, p)| *p)
}

/// Resolve a `showreg` argument.
pub fn showreg_target(arg: &str) -> Option<Peripheral> {
    SHOWREG_TARGETS
        .iter()
        .find(|(name, _)| *name == arg)
        .map(|(_, p)| *p)
}

// --- Command Implementations ---

pub fn help(out: &mut dyn Write) -> Result<(), ConsoleError> {
    let _ = write!(out, "\r\n{}\r\n  Available Commands\r\n{}\r\n", WIDE_RULE, WIDE_RULE);
    for c in COMMANDS {
        let _ = write!(out, "  {:<52}- {}\r\n", c.synopsis, c.brief);
    }
    let _ = write!(out, "{}\r\n\r\n", WIDE_RULE);
    Ok(())
}

pub fn sysinfo(board: &dyn Board, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let info = board.system_info();

    let _ = write!(out, "\r\n{}\r\n  System Information\r\n{}\r\n", RULE, RULE);
    let _ = write!(out, "  MCU:              {}\r\n", info.mcu);
    let _ = write!(out, "  Core:             {}\r\n", info.core);
    let _ = write!(out, "  Firmware:         {}\r\n", crate::VERSION);
    let _ = write!(out, "  HAL Version:      0x{:08X}\r\n", info.hal_version);
    let _ = write!(out, "  Device ID:        0x{:08X}\r\n", info.device_id);
    let _ = write!(out, "  Revision ID:      0x{:08X}\r\n", info.revision_id);
    let _ = write!(out, "{}\r\n", THIN_RULE);
    for (label, hz) in [
        ("SYSCLK:          ", info.sysclk_hz),
        ("HCLK (AHB):      ", info.hclk_hz),
        ("PCLK1 (APB1):    ", info.pclk1_hz),
        ("PCLK2 (APB2):    ", info.pclk2_hz),
    ] {
        let _ = write!(out, "  {} {} Hz ({} MHz)\r\n", label, hz, hz / 1_000_000);
    }
    let _ = write!(out, "{}\r\n", THIN_RULE);
    let _ = write!(out, "  Tick Frequency:   {} Hz\r\n", info.tick_hz);
    let _ = write!(out, "  Uptime:           {} sec\r\n", info.uptime_ms / 1000);
    let _ = write!(out, "{}\r\n\r\n", RULE);
    Ok(())
}

pub fn echo(args: &str, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let _ = write!(out, "{}\r\n", args);
    Ok(())
}

pub fn clear(out: &mut dyn Write) -> Result<(), ConsoleError> {
    let _ = out.write_str(CLEAR_SCREEN);
    Ok(())
}

pub fn status(args: &str, board: &dyn Board, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let target = status_target(args).ok_or(ConsoleError::InvalidArgument)?;
    let regs = board.snapshot(target).ok_or(ConsoleError::Unavailable)?;

    match target {
        Peripheral::GpioA | Peripheral::GpioB | Peripheral::GpioC | Peripheral::GpioD => {
            gpio_status(&regs, out)
        }
        Peripheral::Usart2 => uart_status(&regs, board.system_info().pclk1_hz, out),
        Peripheral::Rcc => rcc_status(&regs, board, out),
        Peripheral::Tim1 => timer_status(&regs, board.system_info().pclk2_hz, out),
    }
    Ok(())
}

pub fn showreg(args: &str, board: &dyn Board, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let target = showreg_target(args).ok_or(ConsoleError::InvalidArgument)?;
    let regs = board.snapshot(target).ok_or(ConsoleError::Unavailable)?;

    let width = target.register_names().iter().map(|n| n.len()).max().unwrap_or(0) + 1;

    let _ = write!(out, "=== {} Raw Registers ===\r\n", target.name());
    for (name, value) in regs.iter() {
        let _ = write!(
            out,
            "{}:{:pad$}0x{:08X}  ({:032b})\r\n",
            name,
            "",
            value,
            value,
            pad = width - name.len()
        );
    }
    Ok(())
}

// --- Status decoders ---

fn field(value: u32, shift: u32, bits: u32) -> u32 {
    (value >> shift) & ((1 << bits) - 1)
}

fn bit(value: u32, n: u32) -> bool {
    value & (1 << n) != 0
}

/// Comma-separated list of set bits below `limit`; "none" if empty.
fn write_bit_list(out: &mut dyn Write, value: u32, limit: u32) {
    let mut first = true;
    for n in (0..limit).filter(|n| bit(value, *n)) {
        let _ = write!(out, "{}{}", if first { "" } else { "," }, n);
        first = false;
    }
    if first {
        let _ = out.write_str("none");
    }
}

/// Names of enabled bits from a `(bit, name)` table.
fn write_enabled(out: &mut dyn Write, value: u32, table: &[(u32, &str)]) {
    let mut first = true;
    for (_, name) in table.iter().filter(|(n, _)| bit(value, *n)) {
        let _ = write!(out, "{}{}", if first { "" } else { ", " }, name);
        first = false;
    }
    if first {
        let _ = out.write_str("none");
    }
}

/// Peripheral behind an alternate-function number on a given pin.
pub fn alternate_function_name(port: char, pin: u32, af: u32) -> &'static str {
    match af {
        0 => "SYS",
        1 => "TIM1/TIM2",
        2 => "TIM3/TIM4/TIM5",
        3 => "TIM9/TIM10/TIM11",
        4 => "I2C",
        5 => "SPI1/SPI2/SPI4",
        6 => "SPI2/SPI3/SPI4",
        7 => match (port, pin) {
            ('A', 2) | ('A', 3) | ('D', 5) | ('D', 6) => "USART2",
            ('A', 9) | ('A', 10) | ('B', 6) | ('B', 7) | ('A', 15) | ('B', 3) => "USART1",
            _ => "USART",
        },
        8 => "USART6",
        9 => "I2C2/I2C3",
        10 => "OTG_FS",
        12 => "SDIO",
        15 => "EVENTOUT",
        _ => "Reserved",
    }
}

fn gpio_status(regs: &RegisterBlock, out: &mut dyn Write) {
    let p = regs.peripheral();
    let letter = p.port_letter().unwrap_or('?');
    let moder = regs.reg("MODER");
    let otyper = regs.reg("OTYPER");
    let ospeedr = regs.reg("OSPEEDR");
    let pupdr = regs.reg("PUPDR");
    let idr = regs.reg("IDR");
    let odr = regs.reg("ODR");

    let _ = write!(out, "=== {} Status ===\r\nConfigured Pins:\r\n", p.name());

    let mut any = false;
    for pin in 0..16u32 {
        let mode = field(moder, pin * 2, 2);
        if mode == 0 {
            continue;
        }
        any = true;

        let _ = write!(out, "  P{}{}:{:pad$}", letter, pin, "", pad = if pin < 10 { 2 } else { 1 });
        match mode {
            1 => {
                let kind = if bit(otyper, pin) { "Output (open-drain)" } else { "Output" };
                let _ = out.write_str(kind);
            }
            2 => {
                let afr = if pin < 8 { regs.reg("AFR[0]") } else { regs.reg("AFR[1]") };
                let af = field(afr, (pin % 8) * 4, 4);
                let _ = write!(out, "AF{} ({})", af, alternate_function_name(letter, pin, af));
            }
            _ => {
                let _ = out.write_str("Analog");
            }
        }

        let speed = match field(ospeedr, pin * 2, 2) {
            0 => "Low",
            1 => "Medium",
            2 => "Fast",
            _ => "Very High",
        };
        let pull = match field(pupdr, pin * 2, 2) {
            0 => "None",
            1 => "Pull-up",
            2 => "Pull-down",
            _ => "Reserved",
        };
        let _ = write!(out, ", Speed: {}, Pull: {}", speed, pull);
        if mode == 1 {
            let _ = write!(out, ", State: {}", if bit(odr, pin) { "HIGH" } else { "LOW" });
        }
        let _ = out.write_str("\r\n");
    }
    if !any {
        let _ = out.write_str("  (all pins input)\r\n");
    }

    let _ = write!(out, "\r\nInput States:\r\n  IDR: {:032b} (HIGH pins: ", idr);
    write_bit_list(out, idr, 16);
    let _ = write!(out, ")\r\n\r\nOutput States:\r\n  ODR: {:032b} (HIGH pins: ", odr);
    write_bit_list(out, odr, 16);
    let _ = out.write_str(")\r\n");
}

fn uart_status(regs: &RegisterBlock, pclk1_hz: u32, out: &mut dyn Write) {
    let sr = regs.reg("SR");
    let brr = regs.reg("BRR");
    let cr1 = regs.reg("CR1");
    let cr2 = regs.reg("CR2");
    let cr3 = regs.reg("CR3");

    let _ = write!(out, "=== {} Status ===\r\nConfiguration:\r\n", regs.peripheral().name());
    if brr == 0 {
        let _ = out.write_str("  Baud Rate:    not set\r\n");
    } else {
        let _ = write!(out, "  Baud Rate:    {}\r\n", pclk1_hz / brr);
    }
    let _ = write!(out, "  Data Bits:    {}\r\n", if bit(cr1, 12) { 9 } else { 8 });
    let stop = match field(cr2, 12, 2) {
        0 => "1",
        1 => "0.5",
        2 => "2",
        _ => "1.5",
    };
    let _ = write!(out, "  Stop Bits:    {}\r\n", stop);
    let parity = match (bit(cr1, 10), bit(cr1, 9)) {
        (false, _) => "None",
        (true, false) => "Even",
        (true, true) => "Odd",
    };
    let _ = write!(out, "  Parity:       {}\r\n", parity);
    let mode = match (bit(cr1, 3), bit(cr1, 2)) {
        (true, true) => "TX + RX",
        (true, false) => "TX only",
        (false, true) => "RX only",
        (false, false) => "Disabled",
    };
    let _ = write!(out, "  Mode:         {}\r\n", mode);
    let flow = match (bit(cr3, 8), bit(cr3, 9)) {
        (false, false) => "None",
        (true, false) => "RTS",
        (false, true) => "CTS",
        (true, true) => "RTS/CTS",
    };
    let _ = write!(out, "  Flow Control: {}\r\n", flow);

    let _ = write!(
        out,
        "\r\nStatus:\r\n  USART:        {}\r\n",
        if bit(cr1, 13) { "Enabled" } else { "Disabled" }
    );
    let _ = write!(
        out,
        "  TX Buffer:    {}\r\n",
        if bit(sr, 7) { "Empty (ready to send)" } else { "Busy" }
    );
    let _ = write!(
        out,
        "  RX Buffer:    {}\r\n",
        if bit(sr, 5) { "Data pending" } else { "Empty (no data)" }
    );
    let _ = out.write_str("  Errors:       ");
    write_enabled(out, sr, &[(3, "Overrun"), (1, "Framing"), (0, "Parity"), (2, "Noise")]);
    let _ = out.write_str("\r\n");
}

const AHB1_PERIPHERALS: &[(u32, &str)] = &[
    (0, "GPIOA"),
    (1, "GPIOB"),
    (2, "GPIOC"),
    (3, "GPIOD"),
    (4, "GPIOE"),
    (7, "GPIOH"),
    (12, "CRC"),
    (21, "DMA1"),
    (22, "DMA2"),
];

const APB1_PERIPHERALS: &[(u32, &str)] = &[
    (0, "TIM2"),
    (1, "TIM3"),
    (2, "TIM4"),
    (3, "TIM5"),
    (11, "WWDG"),
    (14, "SPI2"),
    (15, "SPI3"),
    (17, "USART2"),
    (21, "I2C1"),
    (22, "I2C2"),
    (23, "I2C3"),
    (28, "PWR"),
];

const APB2_PERIPHERALS: &[(u32, &str)] = &[
    (0, "TIM1"),
    (4, "USART1"),
    (5, "USART6"),
    (8, "ADC1"),
    (11, "SDIO"),
    (12, "SPI1"),
    (13, "SPI4"),
    (14, "SYSCFG"),
    (16, "TIM9"),
    (17, "TIM10"),
    (18, "TIM11"),
];

fn ahb_divider(hpre: u32) -> u32 {
    match hpre {
        0..=7 => 1,
        8 => 2,
        9 => 4,
        10 => 8,
        11 => 16,
        12 => 64,
        13 => 128,
        14 => 256,
        _ => 512,
    }
}

fn apb_divider(ppre: u32) -> u32 {
    match ppre {
        0..=3 => 1,
        4 => 2,
        5 => 4,
        6 => 8,
        _ => 16,
    }
}

fn rcc_status(regs: &RegisterBlock, board: &dyn Board, out: &mut dyn Write) {
    let cr = regs.reg("CR");
    let cfgr = regs.reg("CFGR");
    let pll = regs.reg("PLLCFGR");
    let info = board.system_info();
    let sws = field(cfgr, 2, 2);

    let source = |on: bool, ready: bool| match (on, ready) {
        (false, _) => "Off",
        (true, false) => "On, not ready",
        (true, true) => "Ready",
    };

    let _ = out.write_str("=== Clock Configuration Status ===\r\nClock Sources:\r\n");
    let _ = write!(out, "  HSI:  {}\r\n", source(bit(cr, 0), bit(cr, 1)));
    let _ = write!(out, "  HSE:  {}\r\n", source(bit(cr, 16), bit(cr, 17)));
    let _ = write!(
        out,
        "  PLL:  {}{}\r\n",
        source(bit(cr, 24), bit(cr, 25)),
        if sws == 2 { ", Active" } else { "" }
    );

    let sys_source = match sws {
        0 => "HSI",
        1 => "HSE",
        2 => "PLL",
        _ => "Invalid",
    };
    let mhz = |hz: u32| hz / 1_000_000;
    let _ = out.write_str("\r\nSystem Clocks:\r\n");
    let _ = write!(out, "  SYSCLK:  {} MHz  (Source: {})\r\n", mhz(info.sysclk_hz), sys_source);
    let _ = write!(
        out,
        "  HCLK:    {} MHz  (AHB Prescaler: /{})\r\n",
        mhz(info.hclk_hz),
        ahb_divider(field(cfgr, 4, 4))
    );
    let _ = write!(
        out,
        "  PCLK1:   {} MHz  (APB1 Prescaler: /{})\r\n",
        mhz(info.pclk1_hz),
        apb_divider(field(cfgr, 10, 3))
    );
    let _ = write!(
        out,
        "  PCLK2:   {} MHz  (APB2 Prescaler: /{})\r\n",
        mhz(info.pclk2_hz),
        apb_divider(field(cfgr, 13, 3))
    );

    let _ = out.write_str("\r\nPLL Configuration:\r\n");
    let _ = write!(out, "  Source:  {}\r\n", if bit(pll, 22) { "HSE" } else { "HSI" });
    let _ = write!(out, "  M:       {}\r\n", field(pll, 0, 6));
    let _ = write!(out, "  N:       {}\r\n", field(pll, 6, 9));
    let _ = write!(out, "  P:       {}\r\n", (field(pll, 16, 2) + 1) * 2);
    let _ = write!(out, "  Q:       {}\r\n", field(pll, 24, 4));

    let _ = out.write_str("\r\nEnabled Peripherals:\r\n  AHB1: ");
    write_enabled(out, regs.reg("AHB1ENR"), AHB1_PERIPHERALS);
    let _ = out.write_str("\r\n  APB1: ");
    write_enabled(out, regs.reg("APB1ENR"), APB1_PERIPHERALS);
    let _ = out.write_str("\r\n  APB2: ");
    write_enabled(out, regs.reg("APB2ENR"), APB2_PERIPHERALS);
    let _ = out.write_str("\r\n");
}

fn timer_status(regs: &RegisterBlock, clock_hz: u32, out: &mut dyn Write) {
    let cr1 = regs.reg("CR1");
    let ccmr1 = regs.reg("CCMR1");
    let ccer = regs.reg("CCER");
    let psc = regs.reg("PSC") & 0xFFFF;
    let arr = regs.reg("ARR") & 0xFFFF;

    let mode = if field(ccmr1, 0, 2) != 0 {
        "Input Capture"
    } else {
        match field(ccmr1, 4, 3) {
            0 => "Frozen",
            1 => "Active on match",
            2 => "Inactive on match",
            3 => "Toggle",
            4 => "Force inactive",
            5 => "Force active",
            6 => "PWM Mode 1",
            _ => "PWM Mode 2",
        }
    };

    let _ = write!(out, "=== {} Status ===\r\nConfiguration:\r\n", regs.peripheral().name());
    let _ = write!(out, "  Status:       {}\r\n", if bit(cr1, 0) { "Enabled" } else { "Disabled" });
    let _ = write!(out, "  Mode:         {}\r\n", mode);
    let _ = write!(
        out,
        "  Direction:    {}\r\n",
        if bit(cr1, 4) { "Down-counting" } else { "Up-counting" }
    );
    let _ = write!(out, "  Clock Source: Internal ({} MHz)\r\n", clock_hz / 1_000_000);

    let tick_hz = clock_hz / (psc + 1);
    let update_mhz = u64::from(clock_hz) * 1000 / (u64::from(psc + 1) * u64::from(arr + 1));
    let _ = out.write_str("\r\nTiming:\r\n");
    let _ = write!(out, "  Prescaler:    {} (Clock: {} Hz)\r\n", psc, tick_hz);
    let _ = write!(out, "  Period (ARR): {}\r\n", arr);
    let _ = write!(out, "  Frequency:    {}.{:03} Hz\r\n", update_mhz / 1000, update_mhz % 1000);

    let _ = out.write_str("\r\nChannels:\r\n");
    for ch in 1..=4u32 {
        let enabled = bit(ccer, (ch - 1) * 4);
        let ccr = match ch {
            1 => regs.reg("CCR1"),
            2 => regs.reg("CCR2"),
            3 => regs.reg("CCR3"),
            _ => regs.reg("CCR4"),
        };
        let _ = write!(
            out,
            "  CH{}: {}, CCR={}\r\n",
            ch,
            if enabled { "Enabled" } else { "Disabled" },
            ccr
        );
    }

    let _ = out.write_str("\r\nCurrent State:\r\n");
    let _ = write!(out, "  Counter:      {}\r\n", regs.reg("CNT"));
    let _ = write!(
        out,
        "  Interrupt:    {}\r\n",
        if bit(regs.reg("SR"), 0) { "Update flag set" } else { "None pending" }
    );
}
