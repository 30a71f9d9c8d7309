//! Speedometer driver
//!
//! A two-digit 7-segment unit. Both digits share RAM word 0, tens in the
//! low byte; the dot after the units digit is that byte's decimal point.

use embedded_hal::i2c::I2c;
use tcd_core::traits::{SegmentDisplay, SpeedDisplay, BRIGHTNESS_MAX};

use super::buffer::{DigitPair, SegmentBuffer};
use super::ht16k33::{DisplayError, Ht16k33, RAM_WORDS};

const SPEED_POS: usize = 0;

/// Highest speed the unit can show
pub const MAX_SPEED: u8 = 99;

/// The speedometer on an HT16K33
pub struct SpeedoUnit<I2C> {
    chip: Ht16k33<I2C>,
    buffer: SegmentBuffer<RAM_WORDS>,
    speed: Option<u8>,
    dot: bool,
    night: bool,
    night_off: bool,
}

impl<I2C: I2c> SpeedoUnit<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            chip: Ht16k33::new(i2c, address),
            buffer: SegmentBuffer::new(),
            speed: None,
            dot: false,
            night: false,
            night_off: false,
        }
    }

    pub fn address(&self) -> u8 {
        self.chip.address()
    }

    pub fn clear_buf(&mut self) {
        self.buffer.clear();
    }

    pub fn dot(&self) -> bool {
        self.dot
    }
}

impl<I2C: I2c> SegmentDisplay for SpeedoUnit<I2C> {
    type Error = DisplayError<I2C::Error>;

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.chip.invalidate();
        self.chip.oscillator_on()?;
        self.clear_buf();
        self.chip.set_brightness(BRIGHTNESS_MAX, false)?;
        self.chip.clear_ram()?;
        self.chip.on()
    }

    fn show(&mut self) -> Result<(), Self::Error> {
        let pair = self.buffer.pair(SPEED_POS).with_dots(false, self.dot);
        self.buffer.set_pair(SPEED_POS, pair);
        self.chip.write_words(0, self.buffer.words())
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

        if !night {
            self.chip.reset_brightness()?;
            self.on_cond()
        } else if self.night_off {
            self.chip.off()
        } else {
            self.chip.set_brightness_direct(0).map(|_| ())
        }
    }

    fn is_night_mode(&self) -> bool {
        self.night
    }

    fn set_night_mode_off(&mut self, off: bool) {
        self.night_off = off;
    }
}

impl<I2C: I2c> SpeedDisplay for SpeedoUnit<I2C> {
    fn set_speed(&mut self, speed: Option<u8>) {
        self.speed = speed.map(|s| s.min(MAX_SPEED));
        let pair = match self.speed {
            Some(s) => DigitPair::number(s, true, false),
            None => DigitPair::BLANK,
        };
        self.buffer.set_pair(SPEED_POS, pair);
    }

    fn speed(&self) -> Option<u8> {
        self.speed
    }

    fn set_dot(&mut self, on: bool) {
        self.dot = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::mock::MockI2c;

    fn speedo() -> SpeedoUnit<MockI2c> {
        SpeedoUnit::new(MockI2c::new(), 0x70)
    }

    #[test]
    fn test_speed_digits() {
        let mut speedo = speedo();
        speedo.set_speed(Some(88));
        speedo.show().unwrap();
        let frame = speedo.chip.bus().last_frame().unwrap();
        assert_eq!(frame[0], DigitPair::number(88, false, false).to_word());
        assert!(frame[1..].iter().all(|&w| w == 0));
    }

    #[test]
    fn test_single_digit_has_no_leading_zero() {
        let mut speedo = speedo();
        speedo.set_speed(Some(7));
        assert_eq!(speedo.buffer.pair(0).tens, 0);
        assert_ne!(speedo.buffer.pair(0).units, 0);
    }

    #[test]
    fn test_speed_clamps_and_blanks() {
        let mut speedo = speedo();
        speedo.set_speed(Some(150));
        assert_eq!(speedo.speed(), Some(99));
        speedo.set_speed(None);
        assert_eq!(speedo.buffer.get(0), 0);
    }

    #[test]
    fn test_dot() {
        let mut speedo = speedo();
        speedo.set_speed(Some(12));
        speedo.set_dot(true);
        speedo.show().unwrap();
        assert_eq!(speedo.chip.bus().last_frame().unwrap()[0] & 0x8080, 0x8000);

        speedo.set_dot(false);
        speedo.show().unwrap();
        assert_eq!(speedo.chip.bus().last_frame().unwrap()[0] & 0x8080, 0);
    }

    #[test]
    fn test_night_off_policy() {
        let mut speedo = speedo();
        speedo.set_night_mode_off(true);
        speedo.on().unwrap();
        speedo.set_night_mode(true).unwrap();
        speedo.on_cond().unwrap();
        assert_eq!(speedo.chip.bus().commands(), [0x81, 0x80]);

        speedo.set_night_mode(false).unwrap();
        assert_eq!(speedo.chip.bus().commands().last(), Some(&0x81));
    }
}
