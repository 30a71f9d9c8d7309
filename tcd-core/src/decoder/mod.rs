//! Signal decoder
//!
//! Turns DMX frames into display updates. Each poll:
//!
//! 1. validates the frame (if one arrived) and refreshes liveness
//! 2. compares every unit's window against its [`ChangeCache`] and decodes
//!    only the windows that changed
//! 3. samples the heartbeat line and, while the source is connected,
//!    toggles blinking colons on an edge
//! 4. flushes every unit touched in steps 2 and 3, powering lit units on
//!    only after their buffer has been written
//! 5. checks for loss of signal and invalidates every cache if so
//!
//! Nothing here fails. Rejected frames and bus errors are reported in the
//! returned [`PollReport`] for the caller to log.

mod cache;
mod link;


pub use cache::ChangeCache;
pub use link::{LinkEvent, LinkMonitor};

use tcd_protocol::layout::{channel, AuxChannel, ClockChannel, AUX_WINDOW_LEN, CLOCK_WINDOW_LEN};
use tcd_protocol::{DmxFrame, FrameError};

use crate::config::{Capabilities, FixtureConfig, CLOCK_UNITS};
use crate::quantize::{self, ampm_from_raw, colon_from_raw};
use crate::traits::{AmPm, ClockDisplay, ColonMode, DisplayRole, SpeedDisplay};

/// What happened during one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollReport {
    /// Connection state change
    pub link: Option<LinkEvent>,
    /// Why the received frame was not decoded
    pub rejected: Option<FrameError>,
    /// Units whose window changed and was decoded (bit per [`DisplayRole`])
    pub decoded: u8,
    /// Units whose window lies beyond the end of the frame
    pub skipped: u8,
    /// Units flushed to the bus
    pub flushed: u8,
    /// Speedometer window decoded and flushed
    pub aux_flushed: bool,
    /// New value of the "any unit lit" aggregate, when it was recomputed
    pub any_active: Option<bool>,
    /// Bus transactions that failed this cycle
    pub bus_errors: u8,
}

struct ClockUnit<D> {
    display: D,
    cache: ChangeCache<CLOCK_WINDOW_LEN>,
    lit: bool,
}

struct AuxUnit<S> {
    display: S,
    cache: ChangeCache<AUX_WINDOW_LEN>,
    lit: bool,
}

/// Decoder state: owns the display units and everything derived from frames
pub struct Decoder<D, S> {
    caps: Capabilities,
    night_mode_off: bool,
    units: [ClockUnit<D>; CLOCK_UNITS],
    aux: Option<AuxUnit<S>>,
    link: LinkMonitor,
    last_heartbeat: bool,
    active: u8,
}

impl<D, S> Decoder<D, S>
where
    D: ClockDisplay,
    S: SpeedDisplay,
{
    /// Create a decoder
    ///
    /// `displays` are in role order. The speedometer is only used if the
    /// configuration also assigns it a window.
    pub fn new(config: &FixtureConfig, displays: [D; CLOCK_UNITS], aux: Option<S>) -> Self {
        let caps = Capabilities::from_config(config, aux.is_some());
        let aux = aux.filter(|_| caps.has_aux()).map(|display| AuxUnit {
            display,
            cache: ChangeCache::new(),
            lit: true,
        });

        let link = LinkMonitor::new(caps.timeout_ms);

        Self {
            caps,
            night_mode_off: config.night_mode_off,
            units: displays.map(|display| ClockUnit {
                display,
                cache: ChangeCache::new(),
                lit: true,
            }),
            aux,
            link,
            last_heartbeat: false,
            active: 0,
        }
    }

    /// Bring up every unit and show the default dates
    ///
    /// Returns the number of bus errors.
    pub fn boot(&mut self) -> u8 {
        let mut errors = 0u8;
        let mode_24h = self.caps.mode_24h;
        let night_mode_off = self.night_mode_off;

        for (role, unit) in DisplayRole::ALL.into_iter().zip(self.units.iter_mut()) {
            let display = &mut unit.display;
            display.set_24h(mode_24h);
            display.set_night_mode_off(night_mode_off);
            count(&mut errors, display.begin());
            display.set_from_date(role.default_date());
            display.set_ampm(if mode_24h { AmPm::Off } else { AmPm::Am });
            count(&mut errors, display.show());
            unit.lit = true;
            self.active |= role.mask();
        }

        if let Some(aux) = self.aux.as_mut() {
            aux.display.set_night_mode_off(night_mode_off);
            count(&mut errors, aux.display.begin());
            aux.display.set_speed(None);
            count(&mut errors, aux.display.show());
            aux.lit = true;
        }

        errors
    }

    /// Run one control cycle
    ///
    /// `frame` is the most recent complete frame, start code included, or
    /// `None` if nothing new arrived. `heartbeat` is the current level of
    /// the heartbeat line.
    pub fn poll(&mut self, now_ms: u32, frame: Option<&[u8]>, heartbeat: bool) -> PollReport {
        let mut report = PollReport::default();
        let mut dirty = 0u8;
        let mut aux_dirty = false;

        if let Some(bytes) = frame {
            report.link = self.link.frame_received(now_ms);

            match DmxFrame::parse(bytes, self.caps.verification) {
                Ok(frame) => {
                    dirty = self.decode_units(&frame, &mut report);
                    aux_dirty = self.decode_aux(&frame, &mut report);
                    report.decoded = dirty;
                }
                Err(e) => report.rejected = Some(e),
            }
        }

        // a lost source leaves the display frozen, blink included
        if heartbeat != self.last_heartbeat && self.link.is_connected() {
            for (role, unit) in DisplayRole::ALL.into_iter().zip(self.units.iter_mut()) {
                if unit.display.colon_blink() {
                    unit.display.set_colon(!heartbeat);
                    dirty |= role.mask();
                }
            }
        }
        self.last_heartbeat = heartbeat;

        for (role, unit) in DisplayRole::ALL.into_iter().zip(self.units.iter_mut()) {
            if dirty & role.mask() == 0 {
                continue;
            }
            count(&mut report.bus_errors, unit.display.show());
            if unit.lit {
                count(&mut report.bus_errors, unit.display.on_cond());
            }
            report.flushed |= role.mask();
        }

        if aux_dirty {
            if let Some(aux) = self.aux.as_mut() {
                count(&mut report.bus_errors, aux.display.show());
                if aux.lit {
                    count(&mut report.bus_errors, aux.display.on_cond());
                }
                report.aux_flushed = true;
            }
        }

        if report.flushed != 0 {
            report.any_active = Some(self.any_active());
        }

        if let Some(event) = self.link.check(now_ms) {
            self.invalidate();
            report.link = Some(event);
        }

        report
    }

    /// Note receive activity that produced no usable frame
    ///
    /// A line error still proves the source is transmitting.
    pub fn mark_activity(&mut self, now_ms: u32) {
        self.link.activity(now_ms);
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    /// True if at least one clock unit is lit
    pub fn any_active(&self) -> bool {
        self.active != 0
    }

    /// Forget every applied window
    pub fn invalidate(&mut self) {
        for unit in self.units.iter_mut() {
            unit.cache.invalidate();
        }
        if let Some(aux) = self.aux.as_mut() {
            aux.cache.invalidate();
        }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn display(&self, role: DisplayRole) -> &D {
        &self.units[role.index()].display
    }

    pub fn display_mut(&mut self, role: DisplayRole) -> &mut D {
        &mut self.units[role.index()].display
    }

    pub fn speedo(&self) -> Option<&S> {
        self.aux.as_ref().map(|aux| &aux.display)
    }

    pub fn speedo_mut(&mut self) -> Option<&mut S> {
        self.aux.as_mut().map(|aux| &mut aux.display)
    }

    /// Decode changed clock windows, returning the mask of decoded units
    fn decode_units(&mut self, frame: &DmxFrame<'_>, report: &mut PollReport) -> u8 {
        let mut decoded = 0u8;
        let mode_24h = self.caps.mode_24h;

        for (role, unit) in DisplayRole::ALL.into_iter().zip(self.units.iter_mut()) {
            let base = self.caps.unit_bases[role.index()];
            let Some(window) = frame.window::<CLOCK_WINDOW_LEN>(base) else {
                report.skipped |= role.mask();
                continue;
            };
            if !unit.cache.changed(&window) {
                continue;
            }

            unit.lit = apply_clock(&mut unit.display, &window, mode_24h, &mut report.bus_errors);
            if unit.lit {
                self.active |= role.mask();
            } else {
                self.active &= !role.mask();
            }
            unit.cache.store(window);
            decoded |= role.mask();
        }

        decoded
    }

    fn decode_aux(&mut self, frame: &DmxFrame<'_>, report: &mut PollReport) -> bool {
        let (Some(aux), Some(base)) = (self.aux.as_mut(), self.caps.aux_base) else {
            return false;
        };
        let Some(window) = frame.window::<AUX_WINDOW_LEN>(base) else {
            return false;
        };
        if !aux.cache.changed(&window) {
            return false;
        }

        let speed = quantize::SPEED.get(window[AuxChannel::Speed.offset()]);
        aux.display.set_speed(speed.checked_sub(1));

        let level = quantize::BRIGHTNESS.get(window[AuxChannel::Brightness.offset()]);
        aux.lit = apply_brightness(&mut aux.display, level, &mut report.bus_errors);

        aux.cache.store(window);
        true
    }
}

/// Push one clock window into a display; returns whether the unit is lit
fn apply_clock<D: ClockDisplay>(
    display: &mut D,
    window: &[u8; CLOCK_WINDOW_LEN],
    mode_24h: bool,
    errors: &mut u8,
) -> bool {
    display.set_month(quantize::MONTH.get(channel(window, ClockChannel::Month)));
    display.set_day(quantize::DAY.get(channel(window, ClockChannel::Day)));
    display.set_year_digits(
        ClockChannel::YEAR.map(|ch| quantize::YEAR_DIGIT.get(channel(window, ch))),
    );

    // hour and minute buckets are zero-based; the setters take value + 1
    let hours = if mode_24h {
        &quantize::HOUR_24
    } else {
        &quantize::HOUR
    };
    display.set_hour_offset(hours.get(channel(window, ClockChannel::Hour)) + 1);
    display.set_minute(quantize::MINUTE.get(channel(window, ClockChannel::Minute)) + 1);

    display.set_ampm(if mode_24h {
        AmPm::Off
    } else {
        ampm_from_raw(channel(window, ClockChannel::AmPm))
    });

    match colon_from_raw(channel(window, ClockChannel::Colon)) {
        ColonMode::Off => {
            display.set_colon(false);
            display.set_colon_blink(false);
        }
        ColonMode::On => {
            display.set_colon(true);
            display.set_colon_blink(false);
        }
        ColonMode::Blink => display.set_colon_blink(true),
    }

    let level = quantize::BRIGHTNESS.get(channel(window, ClockChannel::Brightness));
    apply_brightness(display, level, errors)
}

/// Brightness bucket 0 powers the unit off now; anything else sets level
/// `bucket - 1` and leaves power-on to the flush
fn apply_brightness<T: crate::traits::SegmentDisplay>(
    display: &mut T,
    bucket: u8,
    errors: &mut u8,
) -> bool {
    match bucket.checked_sub(1) {
        None => {
            count(errors, display.off());
            false
        }
        Some(level) => {
            count(errors, display.set_brightness(level, false).map(|_| ()));
            true
        }
    }
}

fn count<E>(errors: &mut u8, result: Result<(), E>) {
    if result.is_err() {
        *errors = errors.saturating_add(1);
    }
}
