//! Virtual adapter error types.

use chrono::NaiveTime;
use lamplighter_domain::error::HardwareError;

/// Errors specific to the simulated hardware.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VirtualError {
    /// Simulated daylight must start before it ends on the same day.
    #[error("sunrise {sunrise} must be before sunset {sunset}")]
    DaylightOrder { sunrise: NaiveTime, sunset: NaiveTime },

    /// The simulated sensor was unplugged.
    #[error("virtual sensor disconnected")]
    SensorDisconnected,

    /// The simulated relay was jammed.
    #[error("virtual relay jammed")]
    RelayJammed,
}

impl VirtualError {
    /// Wrap as a sensor read failure for propagation across the port boundary.
    #[must_use]
    pub fn into_sensor_error(self) -> HardwareError {
        HardwareError::SensorRead(Box::new(self))
    }

    /// Wrap as a relay write failure for propagation across the port boundary.
    #[must_use]
    pub fn into_output_error(self) -> HardwareError {
        HardwareError::OutputWrite(Box::new(self))
    }
}
