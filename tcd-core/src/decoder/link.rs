//! Liveness tracking for the control signal
//!
//! Any frame, even one rejected for decoding, proves the source is alive.
//! The source is declared lost once more than `timeout_ms` passes without
//! one. Timestamps are free-running milliseconds and may wrap.

use crate::config::DEFAULT_TIMEOUT_MS;

/// Connection state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    Connected,
    Disconnected,
}

/// Frame-arrival watchdog
#[derive(Debug, Clone)]
pub struct LinkMonitor {
    timeout_ms: u32,
    last_frame_ms: u32,
    connected: bool,
}

impl Default for LinkMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS)
    }
}

impl LinkMonitor {
    /// Create a monitor; the source starts out disconnected
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            last_frame_ms: 0,
            connected: false,
        }
    }

    /// Record a received frame
    ///
    /// Returns `Connected` on the first frame after a loss.
    pub fn frame_received(&mut self, now_ms: u32) -> Option<LinkEvent> {
        self.last_frame_ms = now_ms;
        if self.connected {
            None
        } else {
            self.connected = true;
            Some(LinkEvent::Connected)
        }
    }

    /// Record receive activity that did not produce a frame
    ///
    /// Keeps the timer alive without changing the connection state.
    pub fn activity(&mut self, now_ms: u32) {
        self.last_frame_ms = now_ms;
    }

    /// Check for timeout
    ///
    /// Returns `Disconnected` once, on the cycle the timeout expires.
    pub fn check(&mut self, now_ms: u32) -> Option<LinkEvent> {
        if self.connected && self.elapsed(now_ms) > self.timeout_ms {
            self.connected = false;
            Some(LinkEvent::Disconnected)
        } else {
            None
        }
    }

    /// Milliseconds since the last frame or activity
    pub fn elapsed(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_frame_ms)
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
