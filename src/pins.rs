//! Default BCM pin assignments for the valve controller board.
//!
//! Single source of truth for the defaults in [`ValveConfig`](crate::config::ValveConfig);
//! every pin can be overridden at startup.

/// Servo signal for the 4-way valve actuator.
pub const SERVO_BCM: u32 = 18;

/// Green LED: lit once the message bus connection is up.
pub const GREEN_LED_BCM: u32 = 17;

/// Red LED: lit while a control cycle is in flight.
pub const RED_LED_BCM: u32 = 27;

/// Highest BCM GPIO number the daemon accepts.
pub const MAX_BCM: u32 = 53;

/// Servo pulse widths the daemon accepts (microseconds); 0 stops pulses.
pub const SERVO_PULSE_MIN: u32 = 500;
pub const SERVO_PULSE_MAX: u32 = 2500;

/// Default TCP port of the pigpio daemon.
pub const PIGPIO_PORT: u16 = 8888;
