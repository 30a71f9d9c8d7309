//! Control loop task
//!
//! Runs the decoder on a fixed tick: picks up the newest frame, samples the
//! heartbeat line and mirrors the "any unit lit" state on the keypad LED.

use defmt::*;
use embassy_rp::gpio::{Input, Level, Output};
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Instant, Ticker};
use embedded_hal_bus::i2c::RefCellDevice;

use tcd_core::decoder::{Decoder, LinkEvent, PollReport};
use tcd_core::traits::DisplayRole;
use tcd_drivers::display::{ClockUnit, SpeedoUnit};

use crate::channels::{FRAME_SIGNAL, LINE_ACTIVITY};

/// Control cycle interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 5;

/// Handle to one unit on the shared display bus
pub type DisplayBus = RefCellDevice<'static, I2c<'static, I2C0, Blocking>>;

/// The decoder as wired on this board
pub type FixtureDecoder = Decoder<ClockUnit<DisplayBus>, SpeedoUnit<DisplayBus>>;

/// Controller task - drives the displays from received frames
#[embassy_executor::task]
pub async fn controller_task(
    mut decoder: FixtureDecoder,
    heartbeat: Input<'static>,
    mut led: Output<'static>,
) {
    info!("Controller task started");

    let debug_log = decoder.capabilities().debug;
    led.set_level(Level::from(decoder.any_active()));

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        ticker.next().await;

        // millisecond counter wraps; the link monitor uses wrapping math
        let now_ms = Instant::now().as_millis() as u32;

        if LINE_ACTIVITY.try_take().is_some() {
            decoder.mark_activity(now_ms);
        }

        let frame = FRAME_SIGNAL.try_take();
        let report = decoder.poll(now_ms, frame.as_deref(), heartbeat.is_high());

        log_report(&report, debug_log);

        if let Some(active) = report.any_active {
            led.set_level(Level::from(active));
        }
    }
}

fn log_report(report: &PollReport, debug_log: bool) {
    match report.link {
        Some(LinkEvent::Connected) => info!("DMX source connected"),
        Some(LinkEvent::Disconnected) => info!("DMX source lost"),
        None => {}
    }

    if let Some(e) = report.rejected {
        warn!("Frame rejected: {:?}", e);
    }

    if report.bus_errors > 0 {
        warn!("{} display bus errors", report.bus_errors);
    }

    if !debug_log {
        return;
    }

    for role in DisplayRole::ALL {
        if report.skipped & role.mask() != 0 {
            debug!("{}: frame too short", role.name());
        } else if report.flushed & role.mask() != 0 {
            debug!("{}: refreshed", role.name());
        }
    }
    if report.aux_flushed {
        debug!("speedo: refreshed");
    }
}
