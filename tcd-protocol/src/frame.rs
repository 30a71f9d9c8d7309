//! DMX512 frame validation and slot access.
//!
//! Frame format:
//! - START CODE (slot 0): 0x00 for dimmer data, anything else is rejected
//! - CHANNELS (slots 1-512): one byte per control channel
//!
//! Channel numbers are 1-based, so channel `n` lives in slot `n`.

use heapless::Vec;

/// Start code for standard (dimmer) DMX data
pub const START_CODE_DIMMER: u8 = 0x00;

/// Maximum number of channel slots in a universe
pub const MAX_SLOTS: usize = 512;

/// Maximum complete frame size (START CODE + slots)
pub const MAX_FRAME_SIZE: usize = 1 + MAX_SLOTS;

/// Owned copy of a received frame, for handing frames between tasks
pub type FrameBuffer = Vec<u8, MAX_FRAME_SIZE>;

/// Reasons a received frame is not used for decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Frame contained no start code
    Empty,
    /// More than 513 bytes between two breaks
    TooLong,
    /// Start code other than dimmer data (RDM, text packets, ...)
    UnsupportedStartCode(u8),
    /// Verification slot missing or not holding the sentinel
    VerificationFailed {
        /// Value found in the verification slot, if the frame reached it
        found: Option<u8>,
    },
}

/// Optional sanity check: one slot must carry a fixed sentinel value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Verification {
    /// Slot index (equals the 1-based channel number)
    pub slot: u16,
    /// Value the slot must hold
    pub sentinel: u8,
}

impl Verification {
    /// Create a verification rule
    pub const fn new(slot: u16, sentinel: u8) -> Self {
        Self { slot, sentinel }
    }

    /// Check the rule against raw frame slots
    pub fn check(&self, slots: &[u8]) -> Result<(), FrameError> {
        match slots.get(usize::from(self.slot)) {
            Some(&value) if value == self.sentinel => Ok(()),
            found => Err(FrameError::VerificationFailed {
                found: found.copied(),
            }),
        }
    }
}

/// A validated, borrowed DMX frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmxFrame<'a> {
    slots: &'a [u8],
}

impl<'a> DmxFrame<'a> {
    /// Validate raw frame bytes (start code included)
    ///
    /// Rejects frames with a non-zero start code and, when `verification`
    /// is given, frames whose verification slot does not hold the sentinel.
    pub fn parse(slots: &'a [u8], verification: Option<Verification>) -> Result<Self, FrameError> {
        let start_code = *slots.first().ok_or(FrameError::Empty)?;

        if slots.len() > MAX_FRAME_SIZE {
            return Err(FrameError::TooLong);
        }

        if start_code != START_CODE_DIMMER {
            return Err(FrameError::UnsupportedStartCode(start_code));
        }

        if let Some(rule) = verification {
            rule.check(slots)?;
        }

        Ok(Self { slots })
    }

    /// The start code (always zero for a parsed frame)
    pub fn start_code(&self) -> u8 {
        self.slots[0]
    }

    /// Number of slots including the start code
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the frame carries no channel data after the start code
    pub fn is_empty(&self) -> bool {
        self.slots.len() <= 1
    }

    /// Read one slot
    pub fn slot(&self, index: usize) -> Option<u8> {
        self.slots.get(index).copied()
    }

    /// Copy out a fixed-width window starting at `base`
    ///
    /// Returns `None` if the frame is too short to contain the whole window.
    pub fn window<const N: usize>(&self, base: usize) -> Option<[u8; N]> {
        let end = base.checked_add(N)?;
        let bytes = self.slots.get(base..end)?;
        let mut window = [0u8; N];
        window.copy_from_slice(bytes);
        Some(window)
    }

    /// The raw bytes
    pub fn as_slice(&self) -> &'a [u8] {
        self.slots
    }
}
