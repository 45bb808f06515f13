//! Validated controller configuration.
//!
//! Loaded once at startup by the binary crate and never mutated afterwards.

use chrono::Duration;
use chrono_tz::Tz;

use crate::daytime::Thresholds;
use crate::error::ValidationError;
use crate::plan::MaxDelays;
use crate::schedule::Schedule;

/// Everything the control loop needs to know, already validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub timezone: Tz,
    pub thresholds: Thresholds,
    pub schedule: Schedule,
    pub max_delays: MaxDelays,
    /// Minimum time between two physical relay switches.
    pub min_switch_interval: Duration,
    /// Time between two control ticks.
    pub tick_period: std::time::Duration,
}

impl ControllerConfig {
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveDuration`] if the switch interval
    /// or the tick period is zero.
    pub fn new(
        timezone: Tz,
        thresholds: Thresholds,
        schedule: Schedule,
        max_delays: MaxDelays,
        min_switch_interval: Duration,
        tick_period: std::time::Duration,
    ) -> Result<Self, ValidationError> {
        if min_switch_interval <= Duration::zero() {
            return Err(ValidationError::NonPositiveDuration("min switch interval"));
        }
        if tick_period.is_zero() {
            return Err(ValidationError::NonPositiveDuration("tick period"));
        }
        Ok(Self {
            timezone,
            thresholds,
            schedule,
            max_delays,
            min_switch_interval,
            tick_period,
        })
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Moscow,
            thresholds: Thresholds::default(),
            schedule: Schedule::default(),
            max_delays: MaxDelays::default(),
            min_switch_interval: Duration::seconds(10),
            tick_period: std::time::Duration::from_secs(60),
        }
    }
}
