//! Virtual relay — remembers its level and counts how often it was driven.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lamplighter_app::ports::OutputPort;
use lamplighter_domain::error::HardwareError;

use super::FaultSwitch;
use crate::error::VirtualError;

#[derive(Debug, Default)]
struct RelayState {
    on: bool,
    writes: usize,
}

/// A simulated relay. Clones share the same contact, so a clone kept by the
/// caller observes what the controller did.
#[derive(Debug, Clone, Default)]
pub struct VirtualRelay {
    state: Arc<Mutex<RelayState>>,
    fault: FaultSwitch,
}

impl VirtualRelay {
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.lock_state().on
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.lock_state().writes
    }

    /// Handle that jams the relay while tripped.
    #[must_use]
    pub fn fault_switch(&self) -> FaultSwitch {
        self.fault.clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, RelayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputPort for VirtualRelay {
    fn write(&mut self, on: bool) -> Result<(), HardwareError> {
        if self.fault.is_tripped() {
            return Err(VirtualError::RelayJammed.into_output_error());
        }
        let mut state = self.lock_state();
        state.on = on;
        state.writes += 1;
        tracing::info!(on, writes = state.writes, "virtual relay driven");
        Ok(())
    }
}
