//! # lamplighter-domain
//!
//! Pure domain model for the lamplighter lamp controller.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timezone-aware timestamps
//! - Classify raw ambient-light samples into a **daytime level** and debounce them
//! - Compute the daily **schedule boundaries** (earliest ON, earliest OFF)
//! - Fuse clock and sensor verdicts into a **desired lamp state**
//! - Describe pending **state change plans** and their delay bounds
//! - Hold the validated, immutable controller configuration
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod config;
pub mod error;
pub mod time;

pub mod daytime;
pub mod decision;
pub mod lamp;
pub mod plan;
pub mod schedule;
