//! Segment display traits
//!
//! A display unit keeps a buffer of segment words and only touches the bus
//! when told to. Field setters never fail: out-of-range values are clamped
//! and zero blanks the field. Only operations that issue bus transactions
//! return a `Result`.

/// Highest brightness level a unit accepts
pub const BRIGHTNESS_MAX: u8 = 15;

/// Brightness argument that restores the previous level
pub const BRIGHTNESS_RESTORE: u8 = 255;

/// AM/PM indicator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AmPm {
    #[default]
    Am,
    Pm,
    /// Both LEDs dark (24-hour mode)
    Off,
}

/// Colon behaviour requested by the control channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColonMode {
    #[default]
    Off,
    On,
    /// Toggled by the heartbeat line
    Blink,
}

/// Hardware blink rate of the whole unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkRate {
    #[default]
    Off = 0,
    TwoHz = 1,
    OneHz = 2,
    HalfHz = 3,
}

/// Which of the three clock rows a unit is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayRole {
    Destination,
    Present,
    Departed,
}

impl DisplayRole {
    /// All roles in frame order
    pub const ALL: [DisplayRole; 3] = [
        DisplayRole::Destination,
        DisplayRole::Present,
        DisplayRole::Departed,
    ];

    /// Factory I2C address of the unit
    pub const fn default_address(self) -> u8 {
        match self {
            DisplayRole::Destination => 0x71,
            DisplayRole::Present => 0x72,
            DisplayRole::Departed => 0x74,
        }
    }

    /// Date shown at boot before any frame arrives
    pub const fn default_date(self) -> DateFields {
        let minute = match self {
            DisplayRole::Destination => 21,
            DisplayRole::Present => 22,
            DisplayRole::Departed => 20,
        };
        DateFields {
            year: 1985,
            month: 10,
            day: 26,
            hour: 1,
            minute,
        }
    }

    /// Bit for this unit in the active/flushed masks
    pub const fn mask(self) -> u8 {
        1 << self.index()
    }

    /// Position of the unit's window in the frame
    pub const fn index(self) -> usize {
        match self {
            DisplayRole::Destination => 0,
            DisplayRole::Present => 1,
            DisplayRole::Departed => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DisplayRole::Destination => "destination",
            DisplayRole::Present => "present",
            DisplayRole::Departed => "departed",
        }
    }
}

/// A calendar date and time of day, zero-based minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateFields {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

/// Operations shared by every segment display unit
pub trait SegmentDisplay {
    /// Bus error type
    type Error: core::fmt::Debug;

    /// Start the oscillator, clear buffer and RAM, full brightness, power on
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Flush the buffer to the display
    fn show(&mut self) -> Result<(), Self::Error>;

    /// Power the display on
    fn on(&mut self) -> Result<(), Self::Error>;

    /// Power on unless night mode has switched the unit off
    fn on_cond(&mut self) -> Result<(), Self::Error>;

    /// Power the display off
    fn off(&mut self) -> Result<(), Self::Error>;

    /// Set brightness, clamped to [`BRIGHTNESS_MAX`]
    ///
    /// [`BRIGHTNESS_RESTORE`] re-applies the current level. With `persist`
    /// the level also becomes the one restored after a temporary override.
    /// Returns the level actually applied.
    fn set_brightness(&mut self, level: u8, persist: bool) -> Result<u8, Self::Error>;

    /// Re-apply the persisted brightness
    fn reset_brightness(&mut self) -> Result<(), Self::Error>;

    /// Current brightness level
    fn brightness(&self) -> u8;

    /// Enter or leave night mode
    fn set_night_mode(&mut self, night: bool) -> Result<(), Self::Error>;

    fn is_night_mode(&self) -> bool;

    /// Night mode policy: `true` powers the unit off, `false` dims it
    fn set_night_mode_off(&mut self, off: bool);
}

/// A month/day/year/hour/minute clock unit
pub trait ClockDisplay: SegmentDisplay {
    /// Month 1..=12, 0 blanks
    fn set_month(&mut self, month: u8);

    /// Day 1..=31, 0 blanks
    fn set_day(&mut self, day: u8);

    /// Numeric year, folded into 0..=9999
    fn set_year(&mut self, year: u16);

    /// Four year digits, thousands first; 0 blanks a digit, `n` shows `n - 1`
    fn set_year_digits(&mut self, digits: [u8; 4]);

    /// Hour 0..=23, folded to 1..=12 unless in 24-hour mode; 0 blanks
    fn set_hour(&mut self, hour: u8);

    /// Hour as a one-based offset: 0 blanks, `n` shows `n - 1` clamped to
    /// the current mode's range
    fn set_hour_offset(&mut self, hour: u8);

    /// Minute as a one-based value: 0 blanks, `n` shows `n - 1` clamped to 0..=59
    fn set_minute(&mut self, minute: u8);

    /// AM/PM indicator, applied at the next flush
    fn set_ampm(&mut self, ampm: AmPm);

    /// Colon state, forced on while in night mode
    fn set_colon(&mut self, on: bool);

    fn colon(&self) -> bool;

    fn set_colon_blink(&mut self, blink: bool);

    fn colon_blink(&self) -> bool;

    fn set_24h(&mut self, mode_24h: bool);

    fn is_24h(&self) -> bool;

    /// Last stored field values
    fn date(&self) -> DateFields;

    /// Load every field from a date
    fn set_from_date(&mut self, date: DateFields) {
        self.set_year(date.year);
        self.set_month(date.month);
        self.set_day(date.day);
        self.set_hour(date.hour);
        self.set_minute(date.minute.saturating_add(1));
    }
}

/// Two-digit auxiliary numeric unit
pub trait SpeedDisplay: SegmentDisplay {
    /// Speed 0..=99, `None` blanks
    fn set_speed(&mut self, speed: Option<u8>);

    fn speed(&self) -> Option<u8>;

    /// Decimal dot after the units digit
    fn set_dot(&mut self, on: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_addresses() {
        assert_eq!(DisplayRole::Destination.default_address(), 0x71);
        assert_eq!(DisplayRole::Present.default_address(), 0x72);
        assert_eq!(DisplayRole::Departed.default_address(), 0x74);
    }

    #[test]
    fn test_role_masks_are_distinct() {
        let mut seen = 0u8;
        for role in DisplayRole::ALL {
            assert_eq!(seen & role.mask(), 0);
            seen |= role.mask();
        }
        assert_eq!(seen, 0b111);
    }

    #[test]
    fn test_default_dates() {
        let dest = DisplayRole::Destination.default_date();
        assert_eq!((dest.year, dest.month, dest.day), (1985, 10, 26));
        assert_eq!((dest.hour, dest.minute), (1, 21));
        assert_eq!(DisplayRole::Present.default_date().minute, 22);
        assert_eq!(DisplayRole::Departed.default_date().minute, 20);
    }
}
