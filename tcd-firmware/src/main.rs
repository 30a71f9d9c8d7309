//! Time circuits display firmware
//!
//! Main firmware binary for RP2040-based boards. Reads a DMX512 universe on
//! UART1 and drives three HT16K33 clock units (plus an optional
//! speedometer) on I2C0.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, Blocking, I2c};
use embassy_rp::peripherals::{I2C0, UART1};
use embassy_rp::uart::{
    Config as UartConfig, DataBits, InterruptHandler as UartInterruptHandler, Parity, StopBits,
    UartRx,
};
use embedded_hal_bus::i2c::RefCellDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tcd_core::config::{parse_config, FixtureConfig};
use tcd_core::decoder::Decoder;
use tcd_core::traits::DisplayRole;
use tcd_drivers::display::{ClockUnit, SpeedoUnit};

use crate::tasks::FixtureDecoder;

mod channels;
mod tasks;

/// Embedded fixture configuration (compiled into firmware)
/// Edit fixture.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../fixture.toml");

/// DMX512 line rate
const DMX_BAUDRATE: u32 = 250_000;

/// HT16K33 supports fast-mode I2C
const I2C_FREQUENCY: u32 = 400_000;

bind_interrupts!(struct Irqs {
    UART1_IRQ => UartInterruptHandler<UART1>;
});

// Display bus shared by every unit (must live forever)
static I2C_BUS: StaticCell<RefCell<I2c<'static, I2C0, Blocking>>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Time circuits firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Display bus
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let bus: &'static RefCell<_> = I2C_BUS.init(RefCell::new(i2c));

    let displays = DisplayRole::ALL.map(|role| {
        ClockUnit::new(RefCellDevice::new(bus), config.address(role))
            .with_reverse_ampm(config.reverse_ampm)
    });
    let speedo = config
        .speedo
        .map(|s| SpeedoUnit::new(RefCellDevice::new(bus), s.address));

    let mut decoder: FixtureDecoder = Decoder::new(&config, displays, speedo);
    let errors = decoder.boot();
    if errors > 0 {
        warn!("{} display bus errors during boot", errors);
    } else {
        info!("Displays initialized");
    }

    // DMX input: 250 kbaud, 8N2
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = DMX_BAUDRATE;
    uart_config.data_bits = DataBits::DataBits8;
    uart_config.stop_bits = StopBits::STOP2;
    uart_config.parity = Parity::ParityNone;
    let rx = UartRx::new(p.UART1, p.PIN_9, Irqs, p.DMA_CH0, uart_config);

    // RTC square wave and keypad LED
    let heartbeat = Input::new(p.PIN_15, Pull::Up);
    let led = Output::new(p.PIN_25, Level::Low);

    unwrap!(spawner.spawn(tasks::dmx_rx_task(rx)));
    unwrap!(spawner.spawn(tasks::controller_task(decoder, heartbeat, led)));

    info!("All tasks spawned");
}

/// Parse the embedded configuration, falling back to defaults
fn load_config() -> FixtureConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config: start address {}, timeout {} ms, speedo {}",
                config.start_address,
                config.timeout_ms,
                config.speedo.is_some()
            );
            config
        }
        Err(e) => {
            warn!("Config parse failed at line {}: {:?}, using defaults", e.line, e.kind);
            FixtureConfig::default()
        }
    }
}
