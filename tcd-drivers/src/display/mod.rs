//! HT16K33 segment displays
//!
//! All units share one I2C bus. Each driver keeps a RAM image of its
//! display and writes it out in a single transaction on `show()`.

pub mod buffer;
pub mod clock;
pub mod font;
pub mod ht16k33;
pub mod speedo;

#[cfg(test)]
pub(crate) mod mock;

pub use buffer::{DigitPair, SegmentBuffer};
pub use clock::{month_name, ClockUnit, DirectFlags, TextFlags};
pub use ht16k33::{DisplayError, Ht16k33, RAM_WORDS};
pub use speedo::SpeedoUnit;
