//! Application-level orchestration.
//!
//! Owns remote persistence and AI extraction requests and emits their outcomes as events.
//! UI/CLI layers call into this module to keep I/O out of the reducer.

mod controller;

pub(crate) use controller::{run_controller, StoreCommand};
