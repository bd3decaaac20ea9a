//! Port traits — the hexagonal boundary between the control loop and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CycleDriver / OverrideGateway (domain)
//! ```
//!
//! Driven adapters (sensors, servo, bus publisher, indicator LEDs)
//! implement these traits.  The domain consumes them via generics, so
//! the loop never touches a socket or a pin directly and runs unchanged
//! against the recording mocks in the test suite.

use crate::control::{DutyCycle, MixRatio};
use crate::error::Result;
use crate::sensors::Reading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one fresh set of readings per call.
pub trait SensorPort {
    /// Re-enumerate the probes and read each one.  Never fails; see
    /// [`OneWireSensors`](crate::sensors::w1::OneWireSensors) for the
    /// fallback rules.
    fn read_all(&mut self) -> Vec<Reading>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the valve servo.
///
/// Implementations apply the command as given.  The controller stays
/// inside the configured duty bounds; servo overrides are limited to 0
/// (stop pulses) or the servo's pulse range when they are parsed.
pub trait ActuatorPort {
    fn set_duty(&mut self, duty: DutyCycle) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (driven adapter: domain → message bus)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget publisher.  Implementations log their own failures.
pub trait TelemetryPort {
    fn publish_readings(&mut self, readings: &[Reading]);

    fn publish_ratio(&mut self, ratio: MixRatio);
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → status LED)
// ───────────────────────────────────────────────────────────────

/// A single on/off status output.
pub trait IndicatorPort {
    fn set(&mut self, on: bool);
}

// ── Boxed adapters ────────────────────────────────────────────
//
// The backend is picked at startup, so the wiring code holds its
// adapters as trait objects.

impl<P: SensorPort + ?Sized> SensorPort for Box<P> {
    fn read_all(&mut self) -> Vec<Reading> {
        (**self).read_all()
    }
}

impl<P: ActuatorPort + ?Sized> ActuatorPort for Box<P> {
    fn set_duty(&mut self, duty: DutyCycle) -> Result<()> {
        (**self).set_duty(duty)
    }
}

impl<P: IndicatorPort + ?Sized> IndicatorPort for Box<P> {
    fn set(&mut self, on: bool) {
        (**self).set(on)
    }
}
