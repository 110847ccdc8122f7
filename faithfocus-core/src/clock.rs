//! Wall-clock abstraction.
//!
//! Cache freshness is computed against an injected [`Clock`] so expiry can be
//! exercised deterministically in tests.

use chrono::Utc;
use std::fmt;

use crate::Timestamp;

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current time.
    fn now(&self) -> Timestamp;

    /// The current time in milliseconds since the UNIX epoch.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_millis_matches_now() {
        let clock = SystemClock;
        let before = Utc::now().timestamp_millis();
        let millis = clock.now_millis();
        let after = Utc::now().timestamp_millis();
        assert!(before <= millis && millis <= after);
    }
}
