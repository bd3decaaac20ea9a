//! Mixing-valve controller library.
//!
//! Exposes the control law, the cycle driver, the override gateway and
//! the hardware/bus adapters so both binaries and the integration tests
//! can wire them together.

#![deny(unused_must_use)]

// Links the std time driver that `async_io_mini::Timer` schedules against.
use embassy_time as _;

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod pins;
pub mod topics;

pub mod adapters;
pub mod drivers;
pub mod sensors;
