//! Time source abstraction.
//!
//! The engine never reads the wall clock on its own: callers pass an
//! explicit instant (the `_at` functions in [`crate::totp::core`]) or an
//! injected [`Clock`]. This keeps every evaluation pinned to a single
//! "now" and makes the whole tick cycle testable without sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of unix time in whole seconds.
pub trait Clock {
    fn unix_seconds(&self) -> u64;
}

/// Wall-clock time. The only production implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// A settable clock for deterministic tests and replay.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicU64,
}

impl FixedClock {
    pub fn new(unix_seconds: u64) -> Self {
        Self {
            now: AtomicU64::new(unix_seconds),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, unix_seconds: u64) {
        self.now.store(unix_seconds, Ordering::Relaxed);
    }

    /// Move forward by `seconds`.
    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::Relaxed);
    }
}

impl Clock for FixedClock {
    fn unix_seconds(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_set_and_advance() {
        let clock = FixedClock::new(59);
        assert_eq!(clock.unix_seconds(), 59);
        clock.advance(1);
        assert_eq!(clock.unix_seconds(), 60);
        clock.set(1111111109);
        assert_eq!(clock.unix_seconds(), 1111111109);
    }

    #[test]
    fn system_clock_is_past_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.unix_seconds() > 1_577_836_800);
    }
}
