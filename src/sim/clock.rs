//! Time sources
//!
//! The session only sees plain millisecond timestamps. A `Clock` is what the
//! driver reads them from.

use std::cell::Cell;

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Clock that only moves when told to (tests, headless replays)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move time forward by `ms`
    pub fn advance(&self, ms: u64) -> u64 {
        let now = self.now.get() + ms;
        self.now.set(now);
        now
    }

    /// Jump to an absolute time; never moves backwards
    pub fn set(&self, ms: u64) {
        self.now.set(self.now.get().max(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Browser wall clock (`Date.now()`)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

#[cfg(target_arch = "wasm32")]
impl Clock for BrowserClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(1000);
        assert_eq!(clock.now_ms(), 1000);
        assert_eq!(clock.advance(250), 1250);
        clock.set(900);
        assert_eq!(clock.now_ms(), 1250);
        clock.set(5000);
        assert_eq!(clock.now_ms(), 5000);
    }
}
