//! Control law and the shared reference state it reads.

pub mod mixing;
pub mod state;

pub use mixing::{compute, Decision, DutyBounds, DutyCycle, MixRatio};
pub use state::{ControlState, Setpoints};
