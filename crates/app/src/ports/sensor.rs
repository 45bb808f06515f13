//! Sensor port — raw ambient light readings.

use lamplighter_domain::error::HardwareError;

/// An ambient light sensor behind an analog-to-digital channel.
///
/// Readings span `0..=max_raw` (see
/// [`Thresholds`](lamplighter_domain::daytime::Thresholds)); the direction
/// of the scale is hardware-specific and handled by the classifier.
pub trait SensorPort {
    /// Take one sample.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::SensorRead`] if the bus transaction fails.
    /// The control loop does not retry within a tick.
    fn read(&mut self) -> Result<u8, HardwareError>;
}
