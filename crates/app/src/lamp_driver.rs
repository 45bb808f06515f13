//! Lamp driver — the only owner of the relay and of [`LampState`].
//!
//! Switches are rate-limited: a request arriving less than the configured
//! minimum interval after the previous physical switch is dropped. This
//! protects the relay from chatter and is not retried; the next desired-state
//! evaluation naturally asks again.
//!
//! Dropping the driver while the lamp is lit switches it off.

use chrono::Duration;

use lamplighter_domain::error::HardwareError;
use lamplighter_domain::lamp::LampState;
use lamplighter_domain::time::Timestamp;

use crate::ports::OutputPort;

/// What a call to [`LampDriver::set_state`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The lamp was already in the requested state; the relay was not touched.
    Unchanged,
    /// The relay was driven to the requested state.
    Switched,
    /// The previous switch was too recent; nothing happened.
    Suppressed { since_last: Duration },
}

/// Applies lamp states to an [`OutputPort`].
pub struct LampDriver<O: OutputPort> {
    output: O,
    state: LampState,
    last_switch: Option<Timestamp>,
    min_interval: Duration,
}

impl<O: OutputPort> LampDriver<O> {
    /// Take ownership of the relay. The lamp is assumed off until told
    /// otherwise; call [`force_off`](Self::force_off) to make that true.
    pub fn new(output: O, min_interval: Duration) -> Self {
        Self {
            output,
            state: LampState::Off,
            last_switch: None,
            min_interval,
        }
    }

    #[must_use]
    pub fn state(&self) -> LampState {
        self.state
    }

    /// Instant of the last physical switch, if any.
    #[must_use]
    pub fn last_switch(&self) -> Option<Timestamp> {
        self.last_switch
    }

    /// Drive the lamp to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::OutputWrite`] if the relay cannot be driven.
    /// The recorded state is left unchanged in that case.
    pub fn set_state(
        &mut self,
        target: LampState,
        now: Timestamp,
    ) -> Result<SwitchOutcome, HardwareError> {
        if target == self.state {
            return Ok(SwitchOutcome::Unchanged);
        }

        if let Some(last) = self.last_switch {
            let since_last = now.signed_duration_since(last);
            if since_last < self.min_interval {
                tracing::warn!(
                    requested = %target,
                    since_last_ms = since_last.num_milliseconds(),
                    min_interval_ms = self.min_interval.num_milliseconds(),
                    "switched too recently, ignoring switch"
                );
                return Ok(SwitchOutcome::Suppressed { since_last });
            }
        }

        self.output.write(target.is_on())?;
        tracing::info!(from = %self.state, to = %target, "lamp switched");
        self.state = target;
        self.last_switch = Some(now);
        Ok(SwitchOutcome::Switched)
    }

    /// Drive the relay off regardless of the rate limit.
    ///
    /// Used on startup, when the relay level is unknown, and on shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::OutputWrite`] if the relay cannot be driven.
    pub fn force_off(&mut self, now: Timestamp) -> Result<(), HardwareError> {
        self.output.write(false)?;
        if self.state.is_on() {
            tracing::info!("lamp forced off");
            self.last_switch = Some(now);
        }
        self.state = LampState::Off;
        Ok(())
    }
}

impl<O: OutputPort> Drop for LampDriver<O> {
    fn drop(&mut self) {
        if !self.state.is_on() {
            return;
        }
        match self.output.write(false) {
            Ok(()) => tracing::warn!("lamp switched off while releasing the relay"),
            Err(err) => tracing::error!(%err, "failed to switch lamp off while releasing the relay"),
        }
    }
}
