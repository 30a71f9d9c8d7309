//! Display RAM image
//!
//! The HT16K33 RAM is a row of 16-bit words, one per character position.
//! On the 7-segment positions each word drives two digits: the low byte is
//! the left (tens) digit and the high byte the right (units) digit, so one
//! word write moves a whole two-digit number.

use super::font::{seven_segment_digit, SEG7_DP};

/// Two 7-segment digits sharing one RAM word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitPair {
    /// Segment pattern of the left digit (low byte)
    pub tens: u8,
    /// Segment pattern of the right digit (high byte)
    pub units: u8,
}

impl DigitPair {
    pub const BLANK: Self = Self { tens: 0, units: 0 };

    /// Both digits of `n % 100`
    ///
    /// With `no_lead_zero` a zero tens digit is left dark.
    pub fn number(n: u8, no_lead_zero: bool, corr6: bool) -> Self {
        let n = n % 100;
        let tens = n / 10;
        Self {
            tens: if no_lead_zero && tens == 0 {
                0
            } else {
                seven_segment_digit(tens, corr6)
            },
            units: seven_segment_digit(n % 10, corr6),
        }
    }

    /// Pack into a RAM word
    pub const fn to_word(self) -> u16 {
        self.tens as u16 | (self.units as u16) << 8
    }

    /// Split a RAM word
    pub const fn from_word(word: u16) -> Self {
        Self {
            tens: word as u8,
            units: (word >> 8) as u8,
        }
    }

    /// Same digits with the decimal points set as given
    pub const fn with_dots(self, tens_dp: bool, units_dp: bool) -> Self {
        Self {
            tens: if tens_dp { self.tens | SEG7_DP } else { self.tens & !SEG7_DP },
            units: if units_dp { self.units | SEG7_DP } else { self.units & !SEG7_DP },
        }
    }
}

impl From<DigitPair> for u16 {
    fn from(pair: DigitPair) -> u16 {
        pair.to_word()
    }
}

/// RAM image of `N` character positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentBuffer<const N: usize> {
    words: [u16; N],
}

impl<const N: usize> Default for SegmentBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SegmentBuffer<N> {
    pub const fn new() -> Self {
        Self { words: [0; N] }
    }

    pub fn clear(&mut self) {
        self.words = [0; N];
    }

    /// Word at `pos`, 0 if out of range
    pub fn get(&self, pos: usize) -> u16 {
        self.words.get(pos).copied().unwrap_or(0)
    }

    /// Overwrite the word at `pos`; out-of-range positions are ignored
    pub fn set(&mut self, pos: usize, word: u16) {
        if let Some(w) = self.words.get_mut(pos) {
            *w = word;
        }
    }

    pub fn pair(&self, pos: usize) -> DigitPair {
        DigitPair::from_word(self.get(pos))
    }

    pub fn set_pair(&mut self, pos: usize, pair: DigitPair) {
        self.set(pos, pair.to_word());
    }

    /// OR `mask` into the word at `pos`
    pub fn set_bits(&mut self, pos: usize, mask: u16) {
        self.set(pos, self.get(pos) | mask);
    }

    /// Clear the bits of `mask` in the word at `pos`
    pub fn clear_bits(&mut self, pos: usize, mask: u16) {
        self.set(pos, self.get(pos) & !mask);
    }

    pub fn words(&self) -> &[u16; N] {
        &self.words
    }
}
