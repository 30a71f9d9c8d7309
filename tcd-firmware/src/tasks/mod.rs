//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod controller;
pub mod dmx_rx;

pub use controller::{controller_task, FixtureDecoder};
pub use dmx_rx::dmx_rx_task;
