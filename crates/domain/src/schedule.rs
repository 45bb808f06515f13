//! Daily schedule boundaries — pure time arithmetic.
//!
//! The schedule is a pair of times of day: the earliest moment the lamp may
//! come on in the evening and the earliest moment it may go off again. The
//! off time is typically past midnight, i.e. numerically smaller than the on
//! time; all functions here handle that wraparound.

use chrono::{Duration, NaiveTime};

use crate::error::ValidationError;
use crate::time::{Timestamp, resolve_local};

/// Earliest-on / earliest-off times of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    on_time: NaiveTime,
    off_time: NaiveTime,
}

impl Schedule {
    /// # Errors
    ///
    /// Returns [`ValidationError::SameOnOffTime`] if both boundaries coincide.
    pub fn new(on_time: NaiveTime, off_time: NaiveTime) -> Result<Self, ValidationError> {
        if on_time == off_time {
            return Err(ValidationError::SameOnOffTime);
        }
        Ok(Self { on_time, off_time })
    }

    #[must_use]
    pub fn on_time(&self) -> NaiveTime {
        self.on_time
    }

    #[must_use]
    pub fn off_time(&self) -> NaiveTime {
        self.off_time
    }

    /// Today's earliest-on instant, without rollover.
    #[must_use]
    pub fn today_on_boundary(&self, now: &Timestamp) -> Timestamp {
        today_at(now, self.on_time)
    }

    /// Today's earliest-off instant, without rollover.
    #[must_use]
    pub fn today_off_boundary(&self, now: &Timestamp) -> Timestamp {
        today_at(now, self.off_time)
    }

    /// Next earliest-on instant strictly after `now`.
    #[must_use]
    pub fn next_on_boundary(&self, now: &Timestamp) -> Timestamp {
        roll_forward(now, self.today_on_boundary(now))
    }

    /// Next earliest-off instant strictly after `now`.
    #[must_use]
    pub fn next_off_boundary(&self, now: &Timestamp) -> Timestamp {
        roll_forward(now, self.today_off_boundary(now))
    }
}

impl Default for Schedule {
    /// On from 19:00, off from midnight.
    fn default() -> Self {
        Self {
            on_time: NaiveTime::from_hms_opt(19, 0, 0).expect("19:00 is a valid time"),
            off_time: NaiveTime::MIN,
        }
    }
}

fn today_at(now: &Timestamp, time: NaiveTime) -> Timestamp {
    resolve_local(now.timezone(), now.date_naive().and_time(time))
}

fn roll_forward(now: &Timestamp, today: Timestamp) -> Timestamp {
    if today > *now {
        today
    } else {
        today + Duration::hours(24)
    }
}
