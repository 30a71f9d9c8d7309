//! Clock unit driver
//!
//! One row of the time circuits: a 3-character 14-segment month followed by
//! 7-segment digit pairs for day, year (two pairs), hour and minute.
//!
//! ```text
//! RAM word:  0   1   2   3    4     5     6    7
//! field:     M   O   N   DD   YY    YY    HH   MM
//! extras:                AM/PM colon year-dot
//! ```
//!
//! The AM/PM LEDs are the decimal points of the day pair and the colon is
//! the pair of decimal points on the first year pair. Both are applied when
//! the buffer is flushed so that a field setter can never wipe them.

use embedded_hal::i2c::I2c;
use tcd_core::traits::{
    AmPm, BlinkRate, ClockDisplay, DateFields, SegmentDisplay, BRIGHTNESS_MAX,
};

use super::buffer::{DigitPair, SegmentBuffer};
use super::font::{fourteen_segment, seven_segment, seven_segment_digit};
use super::ht16k33::{DisplayError, Ht16k33, RAM_WORDS};

const MONTH_POS: usize = 0;
const MONTH_LEN: usize = 3;
const DAY_POS: usize = 3;
const YEAR_POS: usize = 4;
const HOUR_POS: usize = 6;
const MIN_POS: usize = 7;

const AMPM_POS: usize = DAY_POS;
const COLON_POS: usize = YEAR_POS;
const YEAR_DOT_POS: usize = YEAR_POS + 1;

const LEFT_DP: u16 = 0x0080;
const RIGHT_DP: u16 = 0x8000;
const COLON_BITS: u16 = LEFT_DP | RIGHT_DP;

/// Alternating pattern lit by [`ClockUnit::lamp_test`]
const LAMP_TEST_WORD: u16 = 0x55AA;

static MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Three-letter name of month 1..=12
pub fn month_name(month: u8) -> Option<&'static str> {
    MONTHS.get(usize::from(month).checked_sub(1)?).copied()
}

/// Options for the `show_*_direct` writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirectFlags(u8);

impl DirectFlags {
    pub const NONE: Self = Self(0);
    /// Show hours 0..=23 without AM/PM regardless of the unit's mode
    pub const FORCE_24: Self = Self(1 << 0);
    /// Leave a zero tens digit dark
    pub const NO_LEAD_ZERO: Self = Self(1 << 1);
    /// Draw "6" with its top segment
    pub const CORR6: Self = Self(1 << 2);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl core::ops::BitOr for DirectFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Options for [`ClockUnit::show_text_direct`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextFlags(u8);

impl TextFlags {
    pub const NONE: Self = Self(0);
    /// Blank the positions the text does not reach
    pub const CLEAR: Self = Self(1 << 0);
    /// Draw "6" with its top segment
    pub const CORR6: Self = Self(1 << 1);
    /// Light the colon
    pub const COLON: Self = Self(1 << 2);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for TextFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A clock row on an HT16K33
pub struct ClockUnit<I2C> {
    chip: Ht16k33<I2C>,
    buffer: SegmentBuffer<RAM_WORDS>,
    date: DateFields,
    ampm: AmPm,
    colon: bool,
    colon_blink: bool,
    mode_24h: bool,
    night: bool,
    night_off: bool,
    reverse_ampm: bool,
    year_dot: bool,
}

impl<I2C: I2c> ClockUnit<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            chip: Ht16k33::new(i2c, address),
            buffer: SegmentBuffer::new(),
            date: DateFields::default(),
            ampm: AmPm::Am,
            colon: false,
            colon_blink: false,
            mode_24h: false,
            night: false,
            night_off: false,
            reverse_ampm: false,
            year_dot: false,
        }
    }

    /// Swap the AM and PM LEDs (boards wired the other way round)
    pub fn with_reverse_ampm(mut self, reverse: bool) -> Self {
        self.reverse_ampm = reverse;
        self
    }

    pub fn address(&self) -> u8 {
        self.chip.address()
    }

    /// Blank the buffer (not the display)
    pub fn clear_buf(&mut self) {
        self.buffer.clear();
    }

    pub fn buffer(&self) -> &SegmentBuffer<RAM_WORDS> {
        &self.buffer
    }

    /// Light every other segment, bypassing the buffer
    pub fn lamp_test(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.chip.write_words(0, &[LAMP_TEST_WORD; RAM_WORDS])
    }

    /// Power on with hardware blinking
    pub fn on_blink(&mut self, rate: BlinkRate) -> Result<(), DisplayError<I2C::Error>> {
        self.chip.blink(rate)
    }

    /// Apply a brightness level without recording it
    pub fn set_brightness_direct(&mut self, level: u8) -> Result<u8, DisplayError<I2C::Error>> {
        self.chip.set_brightness_direct(level)
    }

    /// Decimal point after the year on direct writes
    pub fn set_year_dot(&mut self, on: bool) {
        self.year_dot = on;
    }

    pub fn ampm(&self) -> AmPm {
        self.ampm
    }

    /// Flush everything except the month, which stays dark
    ///
    /// Follow with [`ClockUnit::show_animate2`] to reveal the month.
    pub fn show_animate1(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.show_int(true)
    }

    /// Flush the whole buffer as left by [`ClockUnit::show_animate1`]
    pub fn show_animate2(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.chip.write_words(0, self.buffer.words())
    }

    fn show_int(&mut self, animate: bool) -> Result<(), DisplayError<I2C::Error>> {
        if animate {
            self.chip.off()?;
        }

        self.apply_indicators();

        let mut words = *self.buffer.words();
        if animate {
            words[MONTH_POS..DAY_POS].fill(0);
        }
        self.chip.write_words(0, &words)?;

        if animate {
            self.chip.on()?;
        }
        Ok(())
    }

    fn ampm_bits(&self, ampm: AmPm) -> u16 {
        let (am, pm) = if self.reverse_ampm {
            (RIGHT_DP, LEFT_DP)
        } else {
            (LEFT_DP, RIGHT_DP)
        };
        match ampm {
            AmPm::Am => am,
            AmPm::Pm => pm,
            AmPm::Off => 0,
        }
    }

    fn apply_indicators(&mut self) {
        self.buffer.clear_bits(AMPM_POS, COLON_BITS);
        self.buffer.set_bits(AMPM_POS, self.ampm_bits(self.ampm));

        if self.colon {
            self.buffer.set_bits(COLON_POS, COLON_BITS);
        } else {
            self.buffer.clear_bits(COLON_POS, COLON_BITS);
        }
    }

    // Direct writes ------------------------------------------------------

    /// Write one position straight to the display
    fn direct_col(
        &mut self,
        pos: usize,
        mut word: u16,
        with_colon: bool,
    ) -> Result<(), DisplayError<I2C::Error>> {
        if pos == YEAR_DOT_POS && self.year_dot {
            word |= RIGHT_DP;
        } else if pos == COLON_POS && with_colon {
            word |= COLON_BITS;
        }
        self.chip.write_word(pos, word)
    }

    fn make_num(n: u8, flags: DirectFlags) -> u16 {
        DigitPair::number(
            n,
            flags.contains(DirectFlags::NO_LEAD_ZERO),
            flags.contains(DirectFlags::CORR6),
        )
        .to_word()
    }

    /// Blank the display RAM, leaving the buffer alone
    pub fn clear_display(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.chip.clear_ram()
    }

    /// Show only a month name (or `_` for 0)
    pub fn show_month_direct(
        &mut self,
        month: u8,
        _flags: DirectFlags,
    ) -> Result<(), DisplayError<I2C::Error>> {
        self.clear_display()?;

        match month_name(month.min(12)) {
            Some(name) => {
                for (i, c) in name.bytes().enumerate() {
                    self.direct_col(MONTH_POS + i, fourteen_segment(c, false), false)?;
                }
            }
            None => {
                self.direct_col(MONTH_POS, 0, false)?;
                self.direct_col(MONTH_POS + 1, 0, false)?;
                self.direct_col(MONTH_POS + 2, fourteen_segment(b'_', false), false)?;
            }
        }
        Ok(())
    }

    pub fn show_day_direct(
        &mut self,
        day: u8,
        flags: DirectFlags,
    ) -> Result<(), DisplayError<I2C::Error>> {
        self.clear_display()?;
        self.direct_col(DAY_POS, Self::make_num(day, flags), false)
    }

    pub fn show_year_direct(
        &mut self,
        year: u16,
        mut flags: DirectFlags,
    ) -> Result<(), DisplayError<I2C::Error>> {
        self.clear_display()?;

        let year = year % 10_000;
        let century = (year / 100) as u8;

        let high = if flags.contains(DirectFlags::NO_LEAD_ZERO) && century == 0 {
            0
        } else {
            Self::make_num(century, flags)
        };
        if century != 0 {
            // inner zeros of e.g. 1905 must show
            flags = flags.without(DirectFlags::NO_LEAD_ZERO);
        }

        self.direct_col(YEAR_POS, high, false)?;
        self.direct_col(YEAR_POS + 1, Self::make_num((year % 100) as u8, flags), false)
    }

    pub fn show_hour_direct(
        &mut self,
        hour: u8,
        flags: DirectFlags,
    ) -> Result<(), DisplayError<I2C::Error>> {
        self.clear_display()?;

        let mut hour = hour;
        let ampm = if !self.mode_24h && !flags.contains(DirectFlags::FORCE_24) {
            let ampm = if hour > 11 { AmPm::Pm } else { AmPm::Am };
            hour = fold_12h(hour);
            ampm
        } else {
            AmPm::Off
        };
        let bits = self.ampm_bits(ampm);
        self.chip.write_word(AMPM_POS, bits)?;

        self.direct_col(HOUR_POS, Self::make_num(hour, flags), false)
    }

    pub fn show_minute_direct(
        &mut self,
        minute: u8,
        flags: DirectFlags,
    ) -> Result<(), DisplayError<I2C::Error>> {
        self.clear_display()?;
        self.direct_col(MIN_POS, Self::make_num(minute, flags), false)
    }

    /// Render a short ASCII string straight to the display
    ///
    /// The first three characters go to the month positions, the rest are
    /// packed two per word into the 7-segment positions.
    pub fn show_text_direct(
        &mut self,
        text: &str,
        flags: TextFlags,
    ) -> Result<(), DisplayError<I2C::Error>> {
        let corr6 = flags.contains(TextFlags::CORR6);
        let colon = flags.contains(TextFlags::COLON);
        let mut chars = text.bytes();
        let mut pos = MONTH_POS;

        while pos < MONTH_POS + MONTH_LEN {
            let Some(c) = chars.next() else { break };
            self.direct_col(pos, fourteen_segment(c, corr6), colon)?;
            pos += 1;
        }
        while pos < DAY_POS {
            self.direct_col(pos, 0, colon)?;
            pos += 1;
        }

        while pos <= MIN_POS {
            let Some(first) = chars.next() else { break };
            let mut word = u16::from(seven_segment(first, corr6));
            if let Some(second) = chars.next() {
                word |= u16::from(seven_segment(second, corr6)) << 8;
            }
            self.direct_col(pos, word, colon)?;
            pos += 1;
        }

        if flags.contains(TextFlags::CLEAR) {
            while pos <= MIN_POS {
                self.direct_col(pos, 0, colon)?;
                pos += 1;
            }
        }
        Ok(())
    }
}

/// 0 → 12, 13..=23 → 1..=11
fn fold_12h(hour: u8) -> u8 {
    match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    }
}

impl<I2C: I2c> SegmentDisplay for ClockUnit<I2C> {
    type Error = DisplayError<I2C::Error>;

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.chip.invalidate();
        self.chip.oscillator_on()?;
        self.clear_buf();
        self.chip.set_brightness(BRIGHTNESS_MAX, false)?;
        self.clear_display()?;
        self.chip.on()
    }

    fn show(&mut self) -> Result<(), Self::Error> {
        self.show_int(false)
    }

    fn on(&mut self) -> Result<(), Self::Error> {
        self.chip.on()
    }

    fn on_cond(&mut self) -> Result<(), Self::Error> {
        if self.night && self.night_off {
            return Ok(());
        }
        self.chip.on()
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.chip.off()
    }

    fn set_brightness(&mut self, level: u8, persist: bool) -> Result<u8, Self::Error> {
        self.chip.set_brightness(level, persist)
    }

    fn reset_brightness(&mut self) -> Result<(), Self::Error> {
        self.chip.reset_brightness()
    }

    fn brightness(&self) -> u8 {
        self.chip.brightness()
    }

    fn set_night_mode(&mut self, night: bool) -> Result<(), Self::Error> {
        if night == self.night {
            return Ok(());
        }
        self.night = night;

        if night {
            self.colon = true;
            if self.night_off {
                self.chip.off()
            } else {
                self.chip.set_brightness_direct(0).map(|_| ())
            }
        } else {
            self.chip.reset_brightness()?;
            self.on_cond()
        }
    }

    fn is_night_mode(&self) -> bool {
        self.night
    }

    fn set_night_mode_off(&mut self, off: bool) {
        self.night_off = off;
    }
}

impl<I2C: I2c> ClockDisplay for ClockUnit<I2C> {
    fn set_month(&mut self, month: u8) {
        if month == 0 {
            self.date.month = 0;
            for pos in MONTH_POS..MONTH_POS + MONTH_LEN {
                self.buffer.set(pos, 0);
            }
            return;
        }

        let month = month.clamp(1, 12);
        self.date.month = month;
        if let Some(name) = month_name(month) {
            for (i, c) in name.bytes().enumerate() {
                self.buffer.set(MONTH_POS + i, fourteen_segment(c, false));
            }
        }
    }

    fn set_day(&mut self, day: u8) {
        if day == 0 {
            self.date.day = 0;
            self.buffer.set(DAY_POS, 0);
            return;
        }

        let day = day.clamp(1, 31);
        self.date.day = day;
        self.buffer
            .set_pair(DAY_POS, DigitPair::number(day, false, false));
    }

    fn set_year(&mut self, year: u16) {
        self.date.year = year;
        let year = year % 10_000;
        self.buffer
            .set_pair(YEAR_POS, DigitPair::number((year / 100) as u8, false, false));
        self.buffer
            .set_pair(YEAR_POS + 1, DigitPair::number((year % 100) as u8, false, false));
    }

    fn set_year_digits(&mut self, digits: [u8; 4]) {
        let seg = |d: u8| d.checked_sub(1).map_or(0, |d| seven_segment_digit(d, false));

        self.buffer.set_pair(
            YEAR_POS,
            DigitPair {
                tens: seg(digits[0]),
                units: seg(digits[1]),
            },
        );
        self.buffer.set_pair(
            YEAR_POS + 1,
            DigitPair {
                tens: seg(digits[2]),
                units: seg(digits[3]),
            },
        );

        if digits.iter().all(|&d| d != 0) {
            self.date.year = digits
                .iter()
                .fold(0u16, |acc, &d| acc * 10 + u16::from((d - 1).min(9)));
        }
    }

    fn set_hour(&mut self, hour: u8) {
        if hour == 0 {
            self.date.hour = 0;
            self.buffer.set(HOUR_POS, 0);
            return;
        }

        let hour = hour.min(23);
        self.date.hour = hour;
        let shown = if self.mode_24h { hour } else { fold_12h(hour) };
        self.buffer
            .set_pair(HOUR_POS, DigitPair::number(shown, false, false));
    }

    fn set_hour_offset(&mut self, hour: u8) {
        let Some(hour) = hour.checked_sub(1) else {
            self.date.hour = 0;
            self.buffer.set(HOUR_POS, 0);
            return;
        };

        let hour = hour.min(if self.mode_24h { 23 } else { 12 });
        self.date.hour = hour;
        self.buffer
            .set_pair(HOUR_POS, DigitPair::number(hour, false, false));
    }

    fn set_minute(&mut self, minute: u8) {
        let Some(minute) = minute.checked_sub(1) else {
            self.date.minute = 0;
            self.buffer.set(MIN_POS, 0);
            return;
        };

        let minute = minute.min(59);
        self.date.minute = minute;
        self.buffer
            .set_pair(MIN_POS, DigitPair::number(minute, false, false));
    }

    fn set_ampm(&mut self, ampm: AmPm) {
        self.ampm = ampm;
    }

    fn set_colon(&mut self, on: bool) {
        self.colon = self.night || on;
    }

    fn colon(&self) -> bool {
        self.colon
    }

    fn set_colon_blink(&mut self, blink: bool) {
        self.colon_blink = blink;
    }

    fn colon_blink(&self) -> bool {
        self.colon_blink
    }

    fn set_24h(&mut self, mode_24h: bool) {
        self.mode_24h = mode_24h;
    }

    fn is_24h(&self) -> bool {
        self.mode_24h
    }

    fn date(&self) -> DateFields {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::mock::MockI2c;

    const ZERO: u16 = 0x3F;

    fn unit() -> ClockUnit<MockI2c> {
        ClockUnit::new(MockI2c::new(), 0x71)
    }

    fn bus(unit: &mut ClockUnit<MockI2c>) -> &mut MockI2c {
        unit.chip.bus()
    }

    #[test]
    fn test_begin_sequence() {
        let mut unit = unit();
        unit.begin().unwrap();
        let bus = bus(&mut unit);
        assert_eq!(bus.commands(), [0x21, 0xEF, 0x81]);
        assert_eq!(bus.last_frame().unwrap(), [0; 8]);
    }

    #[test]
    fn test_month_encoding() {
        let mut unit = unit();
        unit.set_month(10);
        assert_eq!(unit.buffer.get(0), fourteen_segment(b'O', false));
        assert_eq!(unit.buffer.get(1), fourteen_segment(b'C', false));
        assert_eq!(unit.buffer.get(2), fourteen_segment(b'T', false));
        assert_eq!(unit.date().month, 10);
    }

    #[test]
    fn test_month_clamps_and_blanks() {
        let mut unit = unit();
        unit.set_month(13);
        assert_eq!(unit.date().month, 12);
        assert_eq!(unit.buffer.get(0), fourteen_segment(b'D', false));

        unit.set_month(0);
        assert_eq!(&unit.buffer.words()[0..3], &[0, 0, 0]);
    }

    #[test]
    fn test_day_clamps() {
        let mut unit = unit();
        unit.set_day(40);
        assert_eq!(unit.date().day, 31);
        assert_eq!(unit.buffer.pair(3), DigitPair::number(31, false, false));
        unit.set_day(0);
        assert_eq!(unit.buffer.get(3), 0);
    }

    #[test]
    fn test_year_packing() {
        let mut unit = unit();
        unit.set_year(1985);
        assert_eq!(unit.buffer.pair(4), DigitPair::number(19, false, false));
        assert_eq!(unit.buffer.pair(5), DigitPair::number(85, false, false));
        // tens digit in the low byte
        assert_eq!(unit.buffer.get(4) & 0xFF, 0x06);

        unit.set_year(12_015);
        assert_eq!(unit.date().year, 12_015);
        assert_eq!(unit.buffer.pair(4), DigitPair::number(20, false, false));
    }

    #[test]
    fn test_year_digits() {
        let mut unit = unit();
        unit.set_year_digits([2, 10, 0, 6]);
        assert_eq!(unit.buffer.pair(4), DigitPair::number(19, false, false));
        let low = unit.buffer.pair(5);
        assert_eq!(low.tens, 0);
        assert_eq!(low.units, seven_segment_digit(5, false));

        unit.set_year_digits([2, 10, 9, 6]);
        assert_eq!(unit.date().year, 1985);
    }

    #[test]
    fn test_hour_folding() {
        let mut unit = unit();
        unit.set_hour(13);
        assert_eq!(unit.buffer.pair(6), DigitPair::number(1, false, false));
        assert_eq!(unit.date().hour, 13);

        unit.set_24h(true);
        unit.set_hour(13);
        assert_eq!(unit.buffer.pair(6), DigitPair::number(13, false, false));

        unit.set_hour(0);
        assert_eq!(unit.buffer.get(6), 0);
    }

    #[test]
    fn test_hour_offset() {
        let mut unit = unit();
        unit.set_hour_offset(1);
        assert_eq!(unit.buffer.get(6), ZERO | ZERO << 8);
        unit.set_hour_offset(14);
        assert_eq!(unit.date().hour, 12);

        unit.set_24h(true);
        unit.set_hour_offset(30);
        assert_eq!(unit.date().hour, 23);

        unit.set_hour_offset(0);
        assert_eq!(unit.buffer.get(6), 0);
        assert_eq!(unit.date().hour, 0);
    }

    #[test]
    fn test_minute_is_one_based() {
        let mut unit = unit();
        unit.set_minute(41);
        assert_eq!(unit.date().minute, 40);
        assert_eq!(unit.buffer.pair(7), DigitPair::number(40, false, false));

        unit.set_minute(200);
        assert_eq!(unit.date().minute, 59);

        unit.set_minute(1);
        assert_eq!(unit.date().minute, 0);

        unit.set_minute(31);
        unit.set_minute(0);
        assert_eq!(unit.buffer.get(7), 0);
        assert_eq!(unit.date().minute, 0);
    }

    #[test]
    fn test_show_applies_ampm_and_colon() {
        let mut unit = unit();
        unit.set_day(26);
        unit.set_year(1985);
        unit.set_ampm(AmPm::Pm);
        unit.set_colon(true);
        unit.show().unwrap();

        let frame = bus(&mut unit).last_frame().unwrap();
        assert_eq!(frame[3] & 0x8080, 0x8000);
        assert_eq!(frame[4] & 0x8080, 0x8080);

        unit.set_ampm(AmPm::Am);
        unit.set_colon(false);
        unit.show().unwrap();
        let frame = bus(&mut unit).last_frame().unwrap();
        assert_eq!(frame[3] & 0x8080, 0x0080);
        assert_eq!(frame[4] & 0x8080, 0);
        // digits survive the indicator bits
        assert_eq!(frame[3] & 0x7F7F, DigitPair::number(26, false, false).to_word());

        unit.set_ampm(AmPm::Off);
        unit.show().unwrap();
        assert_eq!(bus(&mut unit).last_frame().unwrap()[3] & 0x8080, 0);
    }

    #[test]
    fn test_reversed_ampm() {
        let mut unit = unit().with_reverse_ampm(true);
        unit.set_ampm(AmPm::Pm);
        unit.show().unwrap();
        assert_eq!(bus(&mut unit).last_frame().unwrap()[3] & 0x8080, 0x0080);
    }

    #[test]
    fn test_show_is_one_transaction() {
        let mut unit = unit();
        unit.set_month(1);
        unit.show().unwrap();
        let writes = bus(&mut unit).take();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].bytes.len(), 17);
    }

    #[test]
    fn test_animated_show_blanks_month() {
        let mut unit = unit();
        unit.set_month(10);
        unit.set_day(26);
        unit.show_animate1().unwrap();

        let bus_ref = bus(&mut unit);
        assert_eq!(bus_ref.commands(), [0x80, 0x81]);
        let frame = bus_ref.last_frame().unwrap();
        assert_eq!(&frame[0..3], &[0, 0, 0]);
        assert_ne!(frame[3], 0);

        unit.show_animate2().unwrap();
        let frame = bus(&mut unit).last_frame().unwrap();
        assert_eq!(frame[0], fourteen_segment(b'O', false));
    }

    #[test]
    fn test_night_mode_forces_colon() {
        let mut unit = unit();
        unit.set_night_mode(true).unwrap();
        unit.set_colon(false);
        assert!(unit.colon());

        unit.set_night_mode(false).unwrap();
        unit.set_colon(false);
        assert!(!unit.colon());
    }

    #[test]
    fn test_night_mode_dims_or_powers_off() {
        let mut unit = unit();
        unit.set_brightness(12, true).unwrap();
        unit.set_night_mode(true).unwrap();
        assert_eq!(bus(&mut unit).commands().last(), Some(&0xE0));

        unit.set_night_mode(false).unwrap();
        assert_eq!(unit.brightness(), 12);

        let mut unit = self::unit();
        unit.set_night_mode_off(true);
        unit.on().unwrap();
        unit.set_night_mode(true).unwrap();
        assert_eq!(bus(&mut unit).commands().last(), Some(&0x80));

        // routine refreshes cannot override the off policy
        unit.on_cond().unwrap();
        assert_eq!(bus(&mut unit).commands().last(), Some(&0x80));
    }

    #[test]
    fn test_text_direct() {
        let mut unit = unit();
        unit.show_text_direct("ABC1234", TextFlags::CLEAR | TextFlags::COLON)
            .unwrap();

        let writes = bus(&mut unit).take();
        let words: heapless::Vec<(usize, u16), 8> = writes
            .iter()
            .map(|w| (w.position(), w.words()[0]))
            .collect();

        assert_eq!(words[0], (0, fourteen_segment(b'A', false)));
        assert_eq!(words[2], (2, fourteen_segment(b'C', false)));
        let one_two = u16::from(seven_segment(b'1', false)) | u16::from(seven_segment(b'2', false)) << 8;
        assert_eq!(words[3], (3, one_two));
        assert_eq!(words[4].0, 4);
        assert_eq!(words[4].1 & 0x8080, 0x8080);
        // cleared remainder
        assert_eq!(&words[5..], &[(5, 0), (6, 0), (7, 0)]);
    }

    #[test]
    fn test_text_direct_short_without_clear() {
        let mut unit = unit();
        unit.show_text_direct("HI", TextFlags::NONE).unwrap();
        let writes = bus(&mut unit).take();
        // H, I, then blank third letter
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[2].words()[0], 0);
    }

    #[test]
    fn test_text_correct_six() {
        let mut unit = unit();
        unit.show_text_direct("666", TextFlags::CORR6).unwrap();
        let writes = bus(&mut unit).take();
        assert_eq!(writes[0].words()[0], fourteen_segment(b'6', true));
    }

    #[test]
    fn test_hour_direct_sets_ampm() {
        let mut unit = unit();
        unit.show_hour_direct(15, DirectFlags::NONE).unwrap();
        let writes = bus(&mut unit).take();
        // clear, AM/PM, hour
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[1].position(), 3);
        assert_eq!(writes[1].words()[0], 0x8000);
        assert_eq!(writes[2].words()[0], DigitPair::number(3, false, false).to_word());

        unit.show_hour_direct(15, DirectFlags::FORCE_24).unwrap();
        let writes = bus(&mut unit).take();
        assert_eq!(writes[1].words()[0], 0);
        assert_eq!(writes[2].words()[0], DigitPair::number(15, false, false).to_word());
    }

    #[test]
    fn test_year_direct_leading_zero() {
        let mut unit = unit();
        unit.show_year_direct(1905, DirectFlags::NO_LEAD_ZERO).unwrap();
        let writes = bus(&mut unit).take();
        assert_eq!(writes[1].words()[0], DigitPair::number(19, false, false).to_word());
        assert_eq!(writes[2].words()[0], DigitPair::number(5, false, false).to_word());

        unit.show_year_direct(5, DirectFlags::NO_LEAD_ZERO).unwrap();
        let writes = bus(&mut unit).take();
        assert_eq!(writes[1].words()[0], 0);
        assert_eq!(writes[2].words()[0], DigitPair::number(5, true, false).to_word());
    }

    #[test]
    fn test_year_dot_on_direct_write() {
        let mut unit = unit();
        unit.set_year_dot(true);
        unit.show_year_direct(1985, DirectFlags::NONE).unwrap();
        let writes = bus(&mut unit).take();
        assert_eq!(writes[2].words()[0] & 0x8000, 0x8000);
    }

    #[test]
    fn test_month_direct_blank_shows_underscore() {
        let mut unit = unit();
        unit.show_month_direct(0, DirectFlags::NONE).unwrap();
        let writes = bus(&mut unit).take();
        assert_eq!(writes[3].words()[0], fourteen_segment(b'_', false));
    }

    #[test]
    fn test_lamp_test_pattern() {
        let mut unit = unit();
        unit.lamp_test().unwrap();
        assert_eq!(bus(&mut unit).last_frame().unwrap(), [0x55AA; 8]);
    }

    #[test]
    fn test_set_from_date() {
        let mut unit = unit();
        let date = DateFields {
            year: 1955,
            month: 11,
            day: 5,
            hour: 6,
            minute: 0,
        };
        unit.set_from_date(date);
        assert_eq!(unit.date(), date);
        assert_eq!(unit.buffer.pair(7), DigitPair::number(0, false, false));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), Some("JAN"));
        assert_eq!(month_name(12), Some("DEC"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_bus_error_surfaces() {
        let mut unit = unit();
        bus(&mut unit).fail = true;
        assert!(matches!(unit.show(), Err(DisplayError::Bus(_))));
    }
}
