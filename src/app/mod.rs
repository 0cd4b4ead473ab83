//! Application orchestration layer
//!
//! The drag session state machine and the controller that feeds it gesture
//! events and fresh per-tick views of monitors and windows.

pub mod controller;
pub mod session;
#[cfg(test)]
pub mod testing;

pub use controller::{ControllerError, GestureController};
pub use session::{DragSession, SessionOutcome, SessionPhase};
