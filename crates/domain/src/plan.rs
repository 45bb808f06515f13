//! State change plans — a pending transition and the bounds on its delay.

use chrono::Duration;

use crate::error::ValidationError;
use crate::lamp::LampState;
use crate::time::Timestamp;

/// A transition scheduled for a future instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChangePlan {
    pub target_instant: Timestamp,
    pub target_state: LampState,
}

impl StateChangePlan {
    /// Whether `now` has reached the planned instant.
    #[must_use]
    pub fn is_due(&self, now: &Timestamp) -> bool {
        *now >= self.target_instant
    }
}

impl std::fmt::Display for StateChangePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.target_state, self.target_instant)
    }
}

/// Upper bounds on the random delay after ON- and OFF-eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxDelays {
    on: Duration,
    off: Duration,
}

impl MaxDelays {
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveDuration`] if either bound is zero
    /// or negative.
    pub fn new(on: Duration, off: Duration) -> Result<Self, ValidationError> {
        if on <= Duration::zero() {
            return Err(ValidationError::NonPositiveDuration("on max delay"));
        }
        if off <= Duration::zero() {
            return Err(ValidationError::NonPositiveDuration("off max delay"));
        }
        Ok(Self { on, off })
    }

    /// Maximum delay for a transition towards `target`.
    #[must_use]
    pub fn for_target(&self, target: LampState) -> Duration {
        match target {
            LampState::On => self.on,
            LampState::Off => self.off,
        }
    }
}

impl Default for MaxDelays {
    fn default() -> Self {
        Self {
            on: Duration::seconds(60),
            off: Duration::seconds(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Moscow;

    #[test]
    fn should_be_due_at_and_after_target_instant() {
        let target = Moscow.with_ymd_and_hms(2024, 11, 10, 20, 0, 30).unwrap();
        let plan = StateChangePlan {
            target_instant: target,
            target_state: LampState::On,
        };
        assert!(!plan.is_due(&(target - Duration::seconds(1))));
        assert!(plan.is_due(&target));
        assert!(plan.is_due(&(target + Duration::seconds(1))));
    }

    #[test]
    fn should_pick_delay_by_target() {
        let delays = MaxDelays::new(Duration::seconds(90), Duration::seconds(30)).unwrap();
        assert_eq!(delays.for_target(LampState::On), Duration::seconds(90));
        assert_eq!(delays.for_target(LampState::Off), Duration::seconds(30));
    }

    #[test]
    fn should_reject_zero_delay() {
        assert_eq!(
            MaxDelays::new(Duration::zero(), Duration::seconds(30)),
            Err(ValidationError::NonPositiveDuration("on max delay"))
        );
    }
}
