//! # lamplighter-adapter-virtual
//!
//! Simulated hardware for running the controller on a machine without a
//! light sensor or a relay.
//!
//! ## Provided devices
//!
//! | Device | Port | Behaviour |
//! |--------|------|-----------|
//! | Virtual Sensor | `SensorPort` | Follows a dark / twilight / daylight curve around a configured sunrise and sunset, with optional noise |
//! | Virtual Relay | `OutputPort` | Remembers its level; clones observe the same contact |
//!
//! Both devices expose a [`FaultSwitch`] to simulate hardware failures.
//!
//! ## Dependency rule
//!
//! Depends on `lamplighter-app` (port traits) and `lamplighter-domain` only.

mod devices;
pub mod error;

pub use devices::{
    DARK_RAW, DAYLIGHT_RAW, Daylight, FaultSwitch, TWILIGHT_MINUTES, TWILIGHT_RAW, VirtualRelay,
    VirtualSensor,
};
pub use error::VirtualError;
