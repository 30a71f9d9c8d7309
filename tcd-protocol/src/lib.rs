//! DMX512 control-frame protocol
//!
//! This crate defines how the time circuits display reads its control data
//! off a DMX512 universe. A frame is the start code followed by up to 512
//! channel slots; the display only ever looks at a short prefix of it.
//!
//! # Slot layout
//!
//! ```text
//! ┌────────────┬──────────────┬──────────────┬──────────────┬─────┬──────────┐
//! │ START CODE │ DESTINATION  │ PRESENT      │ DEPARTED     │ ... │ SPEEDO   │
//! │ slot 0     │ 11 slots     │ 11 slots     │ 11 slots     │     │ 2 slots  │
//! └────────────┴──────────────┴──────────────┴──────────────┴─────┴──────────┘
//! ```
//!
//! The start code must be zero (dimmer data). An optional verification slot
//! anywhere in the universe can be required to hold a fixed sentinel.

#![no_std]
#![deny(unsafe_code)]

pub mod assembler;
pub mod frame;
pub mod layout;

pub use assembler::FrameAssembler;
pub use frame::{
    DmxFrame, FrameBuffer, FrameError, Verification, MAX_FRAME_SIZE, START_CODE_DIMMER,
};
pub use layout::{
    clock_window_base, AuxChannel, ClockChannel, AUX_WINDOW_LEN, CLOCK_WINDOW_LEN,
    DEFAULT_START_ADDRESS,
};
