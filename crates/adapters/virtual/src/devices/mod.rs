//! Virtual device implementations — ambient light sensor and lamp relay.
//!
//! Both devices can be made to fail through a shared [`FaultSwitch`] so the
//! controller's error paths can be exercised without real hardware.

mod relay;
mod sensor;

pub use relay::VirtualRelay;
pub use sensor::{DARK_RAW, DAYLIGHT_RAW, Daylight, TWILIGHT_MINUTES, TWILIGHT_RAW, VirtualSensor};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle that makes a virtual device fail while tripped.
#[derive(Debug, Clone, Default)]
pub struct FaultSwitch {
    tripped: Arc<AtomicBool>,
}

impl FaultSwitch {
    pub fn trip(&self) {
        self.tripped.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.tripped.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }
}
