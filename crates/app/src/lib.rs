//! # lamplighter-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Clock` — current wall-clock time in the configured timezone
//!   - `SensorPort` — raw ambient light readings
//!   - `OutputPort` — the relay driving the lamp
//! - Provide the stateful use-cases built on top of the domain model:
//!   - `LampDriver` — applies lamp states, guarding against relay chatter
//!   - `TransitionScheduler` — plans jittered transitions under a hard deadline
//!   - `ControlLoop` — the tick-driven pipeline tying everything together
//! - Provide **in-process infrastructure** that doesn't need hardware (system clock)
//!
//! ## Dependency rule
//! Depends on `lamplighter-domain` only (plus `tokio::time` for the tick cadence).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod clock;
pub mod control_loop;
pub mod lamp_driver;
pub mod ports;
pub mod transition_scheduler;
