//! Application-level orchestration utilities.
//!
//! This module owns the prediction request lifecycle (cycle numbering,
//! task spawning) so UI layers stay presentation-only.

mod controller;

pub(crate) use controller::{run_controller, UiCommand};
