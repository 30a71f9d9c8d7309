//! Inter-task communication channels
//!
//! The receive task and the control loop only share these signals. A
//! `Signal` keeps the newest value, so a slow control cycle drops stale
//! frames instead of queueing them.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use tcd_protocol::FrameBuffer;

/// Latest complete DMX frame (start code + slots)
pub static FRAME_SIGNAL: Signal<CriticalSectionRawMutex, FrameBuffer> = Signal::new();

/// Bytes arrived but did not form a usable frame (framing or overrun error,
/// oversized frame). Still proves the line is alive.
pub static LINE_ACTIVITY: Signal<CriticalSectionRawMutex, ()> = Signal::new();
