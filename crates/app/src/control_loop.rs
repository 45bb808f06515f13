//! Control loop — one synchronous pipeline run per tick.
//!
//! Each tick reads the sensor and classifies the sample. A pending plan takes
//! priority: it is fired when due and the tick ends there. Without a plan the
//! decision engine fuses clock and sensor, and a mismatch with the lamp state
//! is handed to the transition scheduler.
//!
//! [`ControlLoop::run`] adds the cadence: it drives the relay off on start,
//! ticks on a fixed period until the shutdown future resolves or a hardware
//! error occurs, and drives the relay off again before returning.

use std::future::Future;

use rand::Rng;
use tokio::time::MissedTickBehavior;

use lamplighter_domain::config::ControllerConfig;
use lamplighter_domain::daytime::DaytimeClassifier;
use lamplighter_domain::decision::{Decision, DecisionEngine};
use lamplighter_domain::error::{LighterError, SchedulingError};
use lamplighter_domain::lamp::LampState;
use lamplighter_domain::plan::StateChangePlan;
use lamplighter_domain::time::Timestamp;

use crate::lamp_driver::{LampDriver, SwitchOutcome};
use crate::ports::{Clock, OutputPort, SensorPort};
use crate::transition_scheduler::{PlanProgress, TransitionScheduler};

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A pending plan was due and handed to the lamp driver.
    Fired {
        plan: StateChangePlan,
        outcome: SwitchOutcome,
    },
    /// A plan is pending but not yet due.
    Waiting(StateChangePlan),
    /// The desired state changed and a new plan was created.
    Planned {
        decision: Decision,
        plan: StateChangePlan,
    },
    /// The desired state matches the lamp; nothing to do.
    Steady(Decision),
    /// The desired state changed but no plan could be made this tick.
    Unschedulable {
        decision: Decision,
        error: SchedulingError,
    },
}

/// The hardware a control loop drives.
pub struct Ports<C, S, O> {
    pub clock: C,
    pub sensor: S,
    pub output: O,
}

/// Owns all controller state and the ports it needs.
pub struct ControlLoop<C, S, O: OutputPort, R> {
    clock: C,
    sensor: S,
    classifier: DaytimeClassifier,
    engine: DecisionEngine,
    scheduler: TransitionScheduler<R>,
    driver: LampDriver<O>,
    tick_period: std::time::Duration,
}

impl<C, S, O, R> ControlLoop<C, S, O, R>
where
    C: Clock,
    S: SensorPort,
    O: OutputPort,
    R: Rng,
{
    /// Wire a control loop from its ports, configuration and jitter source.
    pub fn new(ports: Ports<C, S, O>, config: &ControllerConfig, rng: R) -> Self {
        Self {
            clock: ports.clock,
            sensor: ports.sensor,
            classifier: DaytimeClassifier::new(config.thresholds),
            engine: DecisionEngine::new(config.schedule),
            scheduler: TransitionScheduler::new(config.schedule, config.max_delays, rng),
            driver: LampDriver::new(ports.output, config.min_switch_interval),
            tick_period: config.tick_period,
        }
    }

    #[must_use]
    pub fn lamp_state(&self) -> LampState {
        self.driver.state()
    }

    #[must_use]
    pub fn pending_plan(&self) -> Option<&StateChangePlan> {
        self.scheduler.plan()
    }

    #[must_use]
    pub fn classifier(&self) -> &DaytimeClassifier {
        &self.classifier
    }

    /// Run one tick at the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns [`LighterError::Hardware`] if the sensor or the relay fails.
    pub fn tick(&mut self) -> Result<TickOutcome, LighterError> {
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// Run one tick as if the time were `now`.
    ///
    /// # Errors
    ///
    /// Returns [`LighterError::Hardware`] if the sensor or the relay fails.
    /// Nothing is mutated when the sensor read fails.
    #[tracing::instrument(skip(self, now), fields(now = %now))]
    pub fn tick_at(&mut self, now: Timestamp) -> Result<TickOutcome, LighterError> {
        let raw = self.sensor.read()?;
        let classification = self.classifier.classify(raw);
        tracing::debug!(
            raw = classification.raw,
            value = classification.value,
            sampled = %classification.sampled,
            level = %classification.level,
            suppressed = classification.is_suppressed(),
            "ambient light classified"
        );

        match self.scheduler.fire_if_due(now, &mut self.driver)? {
            PlanProgress::Fired { plan, outcome } => {
                return Ok(TickOutcome::Fired { plan, outcome });
            }
            PlanProgress::Waiting(plan) => return Ok(TickOutcome::Waiting(plan)),
            PlanProgress::Idle => {}
        }

        let decision = self.engine.decide(&now, classification.level);
        let current = self.driver.state();
        tracing::debug!(
            time_verdict = %decision.time_verdict,
            sensor_verdict = %decision.sensor_verdict,
            desired = %decision.desired,
            current = %current,
            "desired state decided"
        );
        if !decision.agreed() {
            tracing::info!(
                time_verdict = %decision.time_verdict,
                sensor_verdict = %decision.sensor_verdict,
                "sensor disagrees with schedule, following schedule"
            );
        }

        if decision.desired == current {
            return Ok(TickOutcome::Steady(decision));
        }

        match self.scheduler.schedule(now, decision.desired) {
            Ok(plan) => Ok(TickOutcome::Planned { decision, plan }),
            Err(error) => Ok(TickOutcome::Unschedulable { decision, error }),
        }
    }

    /// Drive the lamp off, bypassing the switch rate limit.
    ///
    /// # Errors
    ///
    /// Returns [`LighterError::Hardware`] if the relay cannot be driven.
    pub fn shutdown(&mut self) -> Result<(), LighterError> {
        let now = self.clock.now();
        self.driver.force_off(now)?;
        tracing::info!("lamp released");
        Ok(())
    }

    /// Tick on the configured period until `shutdown` resolves.
    ///
    /// The relay is driven off before the first tick and again before
    /// returning, whether the loop ended on request or on a hardware error.
    ///
    /// # Errors
    ///
    /// Returns the first hardware error encountered. If switching the lamp
    /// off afterwards also fails, the first error wins.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), LighterError>
    where
        F: Future<Output = ()>,
    {
        self.driver.force_off(self.clock.now())?;
        tracing::info!(
            tick_secs = self.tick_period.as_secs(),
            "control loop started"
        );

        let mut interval = tokio::time::interval(self.tick_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let result = loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    break Ok(());
                }
                _ = interval.tick() => {
                    if let Err(err) = self.tick() {
                        tracing::error!(%err, "control tick failed, stopping");
                        break Err(err);
                    }
                }
            }
        };

        let released = self.shutdown();
        result.and(released)
    }
}
