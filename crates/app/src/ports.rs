//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the control core and the hardware. They
//! are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.
//!
//! Ports are synchronous: a tick reads one sample and writes at most one
//! relay level, and nothing else runs while it does.

pub mod clock;
pub mod output;
pub mod sensor;

pub use clock::Clock;
pub use output::OutputPort;
pub use sensor::SensorPort;
