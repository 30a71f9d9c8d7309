//! Per-unit change cache
//!
//! Holds the last channel window applied to a unit. `None` means "unknown":
//! any window compares as changed, so the next frame is always reapplied.

/// Last applied window of one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeCache<const N: usize> {
    last: Option<[u8; N]>,
}

impl<const N: usize> Default for ChangeCache<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ChangeCache<N> {
    /// An empty (unknown) cache
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// True if `window` differs from the last applied one
    pub fn changed(&self, window: &[u8; N]) -> bool {
        self.last.as_ref() != Some(window)
    }

    /// Record `window` as applied
    pub fn store(&mut self, window: [u8; N]) {
        self.last = Some(window);
    }

    /// Forget the last window
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn is_known(&self) -> bool {
        self.last.is_some()
    }

    pub fn last(&self) -> Option<&[u8; N]> {
        self.last.as_ref()
    }
}
