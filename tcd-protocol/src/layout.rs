//! Channel layout of the display windows.
//!
//! Each clock unit occupies an 11-channel window; the three clock units are
//! packed back to back from the configured start address. The optional
//! speedometer has its own 2-channel window at a separate address.

/// Default DMX address of the first clock unit's window
pub const DEFAULT_START_ADDRESS: u16 = 1;

/// Channels per clock unit
pub const CLOCK_WINDOW_LEN: usize = 11;

/// Channels for the auxiliary (speedometer) unit
pub const AUX_WINDOW_LEN: usize = 2;

/// Channel meaning within a clock unit's window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ClockChannel {
    /// Month (blank, JAN..DEC)
    Month = 0,
    /// Day of month (blank, 1..31)
    Day = 1,
    /// Year, thousands digit
    YearThousands = 2,
    /// Year, hundreds digit
    YearHundreds = 3,
    /// Year, tens digit
    YearTens = 4,
    /// Year, units digit
    YearUnits = 5,
    /// Hour
    Hour = 6,
    /// Minute
    Minute = 7,
    /// AM/PM indicator
    AmPm = 8,
    /// Colon (off / on / blink)
    Colon = 9,
    /// Master intensity (0 = unit off)
    Brightness = 10,
}

impl ClockChannel {
    /// Offset of this channel inside the window
    pub const fn offset(self) -> usize {
        self as usize
    }

    /// The four year digit channels, most significant first
    pub const YEAR: [ClockChannel; 4] = [
        ClockChannel::YearThousands,
        ClockChannel::YearHundreds,
        ClockChannel::YearTens,
        ClockChannel::YearUnits,
    ];
}

/// Channel meaning within the speedometer window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AuxChannel {
    /// Displayed speed (blank, 0..99)
    Speed = 0,
    /// Master intensity (0 = unit off)
    Brightness = 1,
}

impl AuxChannel {
    /// Offset of this channel inside the window
    pub const fn offset(self) -> usize {
        self as usize
    }
}

/// Slot index of the first channel of clock unit `unit`
///
/// `start_address` is the 1-based DMX address of the first unit, which is
/// also its slot index (slot 0 holds the start code).
pub const fn clock_window_base(start_address: u16, unit: usize) -> usize {
    start_address as usize + unit * CLOCK_WINDOW_LEN
}

/// A window's channel value
pub fn channel(window: &[u8; CLOCK_WINDOW_LEN], ch: ClockChannel) -> u8 {
    window[ch.offset()]
}
