//! System clock — the production [`Clock`] implementation.

use chrono_tz::Tz;

use lamplighter_domain::time::{Timestamp, now_in};

use crate::ports::Clock;

/// Reads the host's UTC clock and converts it to a fixed timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    #[must_use]
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        now_in(self.timezone)
    }
}
