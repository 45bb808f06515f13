//! Output port — the relay that powers the lamp.

use lamplighter_domain::error::HardwareError;

/// A digital output wired to the lamp relay.
pub trait OutputPort {
    /// Drive the relay: `true` lights the lamp, `false` turns it off.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::OutputWrite`] if the pin cannot be driven.
    fn write(&mut self, on: bool) -> Result<(), HardwareError>;
}
