//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`LighterError`]
//! via `#[from]`. [`SchedulingError`] is the exception: it never stops the
//! control loop, so it is reported per tick instead. No `String` variants.

use crate::time::Timestamp;

/// Boxed error produced by a hardware adapter.
pub type AdapterError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for the lamplighter workspace.
#[derive(Debug, thiserror::Error)]
pub enum LighterError {
    /// Configuration rejected at startup.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The sensor or relay could not be accessed.
    #[error("hardware error")]
    Hardware(#[from] HardwareError),
}

/// Invariant violations in the controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("night threshold ({night}) must be below evening threshold ({evening})")]
    ThresholdOrder { night: u8, evening: u8 },

    #[error("evening threshold ({evening}) exceeds sensor range (0..={max_raw})")]
    ThresholdOutOfRange { evening: u8, max_raw: u8 },

    #[error("earliest on and earliest off times must differ")]
    SameOnOffTime,

    #[error("{0} must be strictly positive")]
    NonPositiveDuration(&'static str),
}

/// Failures talking to the physical ports.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    #[error("failed to read ambient light sensor")]
    SensorRead(#[source] AdapterError),

    #[error("failed to write relay output")]
    OutputWrite(#[source] AdapterError),
}

/// Transition planning failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulingError {
    /// The computed deadline leaves no room for a transition. Usually a clock
    /// skew or a misconfigured schedule; retried on the next tick.
    #[error("transition deadline {deadline} is not after {now}")]
    DeadlineNotAfterNow { now: Timestamp, deadline: Timestamp },
}
