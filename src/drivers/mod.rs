//! Peripheral drivers: the pigpio socket client and the pins, LEDs and
//! servo built on it, each with an in-memory twin for simulation.

pub mod gpio;
pub mod pigpio;
pub mod servo;
pub mod status_led;
