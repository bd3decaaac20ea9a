//! Sensor subsystem — 1-Wire temperature probes behind a [`SensorBus`].
//!
//! A bus lists the probes currently present and hands back each probe's
//! raw record.  [`w1::OneWireSensors`] turns that into the ordered list of
//! [`Reading`]s for one cycle.  Bus implementations:
//!
//! | Bus                        | Backend                          |
//! |----------------------------|----------------------------------|
//! | `bus::PigpioW1Bus`         | pigpio daemon file API (remote)  |
//! | `bus::DirectoryW1Bus`      | local sysfs-style directory      |

pub mod bus;
pub mod w1;

use crate::error::SensorError;

/// One probe's temperature for the current cycle.  Its identity is its
/// index in the cycle's sequence; index 0 is the control input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub celsius: f64,
}

impl Reading {
    pub const fn new(celsius: f64) -> Self {
        Self { celsius }
    }
}

/// Returned when the bus cannot enumerate at all, so the loop keeps
/// running without hardware attached.
pub const PLACEHOLDER_READINGS: [Reading; 3] = [
    Reading::new(55.0),
    Reading::new(48.5),
    Reading::new(41.0),
];

/// Raw access to a set of 1-Wire probes.
pub trait SensorBus {
    /// Identifiers of the probes present right now, in enumeration order.
    fn list_sensors(&mut self) -> Result<Vec<String>, SensorError>;

    /// Full text of one probe's record.
    fn read_record(&mut self, id: &str) -> Result<String, SensorError>;
}
