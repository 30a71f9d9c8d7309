//! Break-delimited frame assembly.
//!
//! On the wire a DMX frame is a line break, a mark-after-break, the start
//! code and then the channel slots. A UART reports the break as an error
//! condition, so the receiver feeds data bytes with [`FrameAssembler::feed`]
//! and calls [`FrameAssembler::on_break`] whenever it sees a break; the
//! bytes collected since the previous break form one frame.

use crate::frame::{FrameBuffer, FrameError};

/// State machine collecting bytes between breaks
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    state: AssembleState,
    buffer: FrameBuffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssembleState {
    /// No break seen yet; bytes belong to a partial frame and are dropped
    WaitingForBreak,
    /// Collecting slots after a break
    Collecting,
    /// More than a full universe arrived; drop until the next break
    Overflowed,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Create a new assembler that waits for the first break
    pub fn new() -> Self {
        Self {
            state: AssembleState::WaitingForBreak,
            buffer: FrameBuffer::new(),
        }
    }

    /// Reset to the initial state, discarding any partial frame
    pub fn reset(&mut self) {
        self.state = AssembleState::WaitingForBreak;
        self.buffer.clear();
    }

    /// Feed one received byte
    ///
    /// Returns `Err(FrameError::TooLong)` once, on the first byte past a
    /// full universe.
    pub fn feed(&mut self, byte: u8) -> Result<(), FrameError> {
        match self.state {
            AssembleState::WaitingForBreak | AssembleState::Overflowed => Ok(()),
            AssembleState::Collecting => {
                if self.buffer.push(byte).is_err() {
                    self.state = AssembleState::Overflowed;
                    return Err(FrameError::TooLong);
                }
                Ok(())
            }
        }
    }

    /// Feed several bytes
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<(), FrameError> {
        let mut result = Ok(());
        for &byte in bytes {
            if let Err(e) = self.feed(byte) {
                result = Err(e);
            }
        }
        result
    }

    /// Signal a line break
    ///
    /// Returns the frame collected since the previous break, if there was
    /// a complete one. The assembler then starts collecting the next frame.
    pub fn on_break(&mut self) -> Option<FrameBuffer> {
        let completed = match self.state {
            AssembleState::Collecting if !self.buffer.is_empty() => Some(self.buffer.clone()),
            _ => None,
        };

        self.buffer.clear();
        self.state = AssembleState::Collecting;
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::MAX_FRAME_SIZE;

    #[test]
    fn test_bytes_before_first_break_are_dropped() {
        let mut asm = FrameAssembler::new();
        asm.feed_bytes(&[1, 2, 3]).unwrap();
        assert!(asm.on_break().is_none());
    }

    #[test]
    fn test_frame_between_breaks() {
        let mut asm = FrameAssembler::new();
        assert!(asm.on_break().is_none());
        asm.feed_bytes(&[0, 10, 20, 30]).unwrap();

        let frame = asm.on_break().unwrap();
        assert_eq!(frame.as_slice(), &[0, 10, 20, 30]);
    }

    #[test]
    fn test_consecutive_frames() {
        let mut asm = FrameAssembler::new();
        asm.on_break();
        asm.feed_bytes(&[0, 1]).unwrap();
        assert_eq!(asm.on_break().unwrap().as_slice(), &[0, 1]);
        asm.feed_bytes(&[0, 2]).unwrap();
        assert_eq!(asm.on_break().unwrap().as_slice(), &[0, 2]);
    }

    #[test]
    fn test_back_to_back_breaks_yield_nothing() {
        let mut asm = FrameAssembler::new();
        asm.on_break();
        assert!(asm.on_break().is_none());
    }

    #[test]
    fn test_overflow_drops_frame() {
        let mut asm = FrameAssembler::new();
        asm.on_break();
        for _ in 0..MAX_FRAME_SIZE {
            asm.feed(0).unwrap();
        }
        assert_eq!(asm.feed(0), Err(FrameError::TooLong));
        // Reported once, then silently dropped
        assert_eq!(asm.feed(0), Ok(()));
        assert!(asm.on_break().is_none());

        // Recovers on the next frame
        asm.feed_bytes(&[0, 7]).unwrap();
        assert_eq!(asm.on_break().unwrap().as_slice(), &[0, 7]);
    }

    #[test]
    fn test_reset_discards_partial_frame() {
        let mut asm = FrameAssembler::new();
        asm.on_break();
        asm.feed_bytes(&[0, 1, 2]).unwrap();
        asm.reset();
        assert!(asm.on_break().is_none());
    }
}
