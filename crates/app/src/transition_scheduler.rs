//! Transition scheduler — turns a change of desired state into a jittered,
//! deadline-bounded plan and fires it when due.
//!
//! Two states: **idle** (no plan) and **planned**. A plan is created when the
//! desired state differs from the lamp state, is never recomputed or
//! cancelled while pending, and is cleared when it fires. A change of mind
//! before the plan fires is therefore only picked up after it fired.
//!
//! The delay is drawn uniformly from `(0, deadline - now]` where the deadline
//! is the earlier of the next opposing schedule boundary and the configured
//! maximum delay for the target state.

use chrono::Duration;
use rand::Rng;

use lamplighter_domain::error::{HardwareError, SchedulingError};
use lamplighter_domain::lamp::LampState;
use lamplighter_domain::plan::{MaxDelays, StateChangePlan};
use lamplighter_domain::schedule::Schedule;
use lamplighter_domain::time::Timestamp;

use crate::lamp_driver::{LampDriver, SwitchOutcome};
use crate::ports::OutputPort;

/// Result of checking the pending plan on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanProgress {
    /// No plan exists.
    Idle,
    /// A plan exists but its instant has not been reached.
    Waiting(StateChangePlan),
    /// The plan was due and has been handed to the lamp driver.
    Fired {
        plan: StateChangePlan,
        outcome: SwitchOutcome,
    },
}

/// Plans and fires lamp transitions.
pub struct TransitionScheduler<R> {
    schedule: Schedule,
    max_delays: MaxDelays,
    rng: R,
    plan: Option<StateChangePlan>,
}

impl<R: Rng> TransitionScheduler<R> {
    pub fn new(schedule: Schedule, max_delays: MaxDelays, rng: R) -> Self {
        Self {
            schedule,
            max_delays,
            rng,
            plan: None,
        }
    }

    /// The pending plan, if any.
    #[must_use]
    pub fn plan(&self) -> Option<&StateChangePlan> {
        self.plan.as_ref()
    }

    /// Latest instant by which a transition towards `target` must happen.
    #[must_use]
    pub fn deadline_for(&self, now: &Timestamp, target: LampState) -> Timestamp {
        let opposing = match target {
            LampState::On => self.schedule.next_off_boundary(now),
            LampState::Off => self.schedule.next_on_boundary(now),
        };
        // A cap past the representable range never binds.
        match now.checked_add_signed(self.max_delays.for_target(target)) {
            Some(capped) => opposing.min(capped),
            None => opposing,
        }
    }

    /// Plan a transition towards `target`.
    ///
    /// If a plan already exists it is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError::DeadlineNotAfterNow`] when the deadline
    /// leaves no room for a transition; the scheduler stays idle and the
    /// caller is expected to retry on a later tick.
    pub fn schedule(
        &mut self,
        now: Timestamp,
        target: LampState,
    ) -> Result<StateChangePlan, SchedulingError> {
        if let Some(plan) = self.plan {
            return Ok(plan);
        }

        let deadline = self.deadline_for(&now, target);
        let window = deadline - now;
        if window <= Duration::zero() {
            tracing::error!(%now, %deadline, target_state = %target, "transition deadline is not after now");
            return Err(SchedulingError::DeadlineNotAfterNow { now, deadline });
        }

        let window_ns = window.num_nanoseconds().unwrap_or(i64::MAX);
        let delay = Duration::nanoseconds(self.rng.gen_range(1..=window_ns));
        let plan = StateChangePlan {
            target_instant: now + delay,
            target_state: target,
        };
        tracing::info!(
            target_state = %target,
            at = %plan.target_instant,
            %deadline,
            delay_secs = delay.num_seconds(),
            "transition planned"
        );
        self.plan = Some(plan);
        Ok(plan)
    }

    /// Fire the pending plan if `now` has reached it.
    ///
    /// The plan is cleared as soon as it is handed to the driver, even if the
    /// driver suppresses the switch.
    ///
    /// # Errors
    ///
    /// Propagates [`HardwareError`] from the driver.
    pub fn fire_if_due<O: OutputPort>(
        &mut self,
        now: Timestamp,
        driver: &mut LampDriver<O>,
    ) -> Result<PlanProgress, HardwareError> {
        let Some(plan) = self.plan else {
            return Ok(PlanProgress::Idle);
        };
        if !plan.is_due(&now) {
            tracing::trace!(%plan, "waiting for planned transition");
            return Ok(PlanProgress::Waiting(plan));
        }

        self.plan = None;
        let outcome = driver.set_state(plan.target_state, now)?;
        tracing::debug!(%plan, ?outcome, "planned transition fired");
        Ok(PlanProgress::Fired { plan, outcome })
    }
}
