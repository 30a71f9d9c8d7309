//! Hardware abstraction traits
//!
//! These traits define the interface between the decoder and the
//! segment display drivers that sit on the I2C bus.

pub mod display;

pub use display::{
    AmPm, BlinkRate, ClockDisplay, ColonMode, DateFields, DisplayRole, SegmentDisplay,
    SpeedDisplay, BRIGHTNESS_MAX, BRIGHTNESS_RESTORE,
};
