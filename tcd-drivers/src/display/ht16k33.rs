//! HT16K33 LED controller
//!
//! Thin command layer over an I2C device. Display setup and dimming
//! commands are cached so that repeating the current state costs no bus
//! traffic. The caches start out unknown and are cleared again by
//! [`Ht16k33::invalidate`], which forces the next command through.

use embedded_hal::i2c::I2c;
use heapless::Vec;
use tcd_core::traits::{BlinkRate, BRIGHTNESS_MAX, BRIGHTNESS_RESTORE};

/// Display RAM size in 16-bit words
pub const RAM_WORDS: usize = 8;

/// HT16K33 commands
mod cmd {
    /// System setup: oscillator on
    pub const OSCILLATOR_ON: u8 = 0x21;
    /// Display setup: display off
    pub const DISPLAY_OFF: u8 = 0x80;
    /// Display setup: display on, blink bits in 1..=2
    pub const DISPLAY_ON: u8 = 0x81;
    /// Dimming set: level in the low nibble
    pub const DIMMING: u8 = 0xE0;
}

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// I2C transaction failed
    Bus(E),
    /// Write would run past the end of display RAM
    OutOfRange,
}

/// One HT16K33 on a shared bus
pub struct Ht16k33<I2C> {
    i2c: I2C,
    address: u8,
    /// Last display setup command sent
    setup: Option<u8>,
    /// Last dimming level sent
    dimming: Option<u8>,
    /// Level most recently requested through `set_brightness`
    brightness: u8,
    /// Level restored after a temporary override
    persisted: u8,
}

impl<I2C: I2c> Ht16k33<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            setup: None,
            dimming: None,
            brightness: BRIGHTNESS_MAX,
            persisted: BRIGHTNESS_MAX,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Forget the cached controller state
    pub fn invalidate(&mut self) {
        self.setup = None;
        self.dimming = None;
    }

    /// Send a single command byte, bypassing the caches
    pub fn command(&mut self, byte: u8) -> Result<(), DisplayError<I2C::Error>> {
        self.i2c
            .write(self.address, &[byte])
            .map_err(DisplayError::Bus)
    }

    pub fn oscillator_on(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.command(cmd::OSCILLATOR_ON)
    }

    fn display_setup(&mut self, byte: u8) -> Result<(), DisplayError<I2C::Error>> {
        if self.setup == Some(byte) {
            return Ok(());
        }
        // a failed write leaves the state unknown
        self.setup = None;
        self.command(byte)?;
        self.setup = Some(byte);
        Ok(())
    }

    /// Display on, not blinking
    pub fn on(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.display_setup(cmd::DISPLAY_ON)
    }

    pub fn off(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.display_setup(cmd::DISPLAY_OFF)
    }

    /// Display on with hardware blinking
    pub fn blink(&mut self, rate: BlinkRate) -> Result<(), DisplayError<I2C::Error>> {
        self.display_setup(cmd::DISPLAY_ON | ((rate as u8) << 1))
    }

    /// True once `on()` or `blink()` succeeded and no `off()` followed
    pub fn is_on(&self) -> bool {
        matches!(self.setup, Some(byte) if byte & cmd::DISPLAY_ON == cmd::DISPLAY_ON)
    }

    /// Apply a dimming level without recording it
    ///
    /// Returns the clamped level.
    pub fn set_brightness_direct(&mut self, level: u8) -> Result<u8, DisplayError<I2C::Error>> {
        let level = level.min(BRIGHTNESS_MAX);
        if self.dimming != Some(level) {
            self.dimming = None;
            self.command(cmd::DIMMING | level)?;
            self.dimming = Some(level);
        }
        Ok(level)
    }

    /// Apply and record a brightness level
    ///
    /// [`BRIGHTNESS_RESTORE`] re-applies the recorded level. `persist` also
    /// makes it the level [`Ht16k33::reset_brightness`] returns to.
    pub fn set_brightness(
        &mut self,
        level: u8,
        persist: bool,
    ) -> Result<u8, DisplayError<I2C::Error>> {
        let level = if level == BRIGHTNESS_RESTORE {
            self.brightness
        } else {
            level
        };
        let level = level.min(BRIGHTNESS_MAX);
        self.brightness = level;
        if persist {
            self.persisted = level;
        }
        self.set_brightness_direct(level)
    }

    /// Go back to the persisted level
    pub fn reset_brightness(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.brightness = self.persisted;
        self.set_brightness_direct(self.persisted).map(|_| ())
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Write consecutive RAM words starting at position `start`
    pub fn write_words(&mut self, start: usize, words: &[u16]) -> Result<(), DisplayError<I2C::Error>> {
        if start + words.len() > RAM_WORDS {
            return Err(DisplayError::OutOfRange);
        }

        let mut bytes: Vec<u8, { 1 + RAM_WORDS * 2 }> = Vec::new();
        // capacity covers the whole RAM, checked above
        let _ = bytes.push((start * 2) as u8);
        for word in words {
            let _ = bytes.extend_from_slice(&word.to_le_bytes());
        }

        self.i2c
            .write(self.address, &bytes)
            .map_err(DisplayError::Bus)
    }

    /// Write one RAM word
    pub fn write_word(&mut self, pos: usize, word: u16) -> Result<(), DisplayError<I2C::Error>> {
        self.write_words(pos, &[word])
    }

    /// Zero the whole display RAM
    pub fn clear_ram(&mut self) -> Result<(), DisplayError<I2C::Error>> {
        self.write_words(0, &[0; RAM_WORDS])
    }

    #[cfg(test)]
    pub(crate) fn bus(&mut self) -> &mut I2C {
        &mut self.i2c
    }
}
