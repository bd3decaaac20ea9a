//! Mixing-valve servo.
//!
//! The valve is moved by a hobby servo; a [`DutyCycle`] is sent as the
//! pulse width in microseconds.  [`PigpioServo`] drives the real pin,
//! [`SimulatedServo`] records the last command.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use log::{debug, info};

use crate::app::ports::ActuatorPort;
use crate::control::DutyCycle;
use crate::error::{ActuatorError, Result};

use super::pigpio::{PigpioClient, PigpioError};

impl From<PigpioError> for ActuatorError {
    fn from(e: PigpioError) -> Self {
        match e {
            PigpioError::Daemon(code) => Self::Rejected(code),
            PigpioError::Io(_) | PigpioError::Poisoned => Self::Disconnected,
        }
    }
}

pub struct PigpioServo {
    client: PigpioClient,
    gpio: u32,
}

impl PigpioServo {
    pub fn new(client: PigpioClient, gpio: u32) -> Self {
        Self { client, gpio }
    }
}

impl ActuatorPort for PigpioServo {
    fn set_duty(&mut self, duty: DutyCycle) -> Result<()> {
        debug!("servo gpio{} -> {}us", self.gpio, duty.pulse_width());
        self.client
            .set_servo_pulsewidth(self.gpio, duty.pulse_width())
            .map_err(|e| ActuatorError::from(e).into())
    }
}

// ── Simulation ───────────────────────────────────────────────

/// In-memory servo.  Clones share the last commanded pulse width
/// (0 = never commanded).
#[derive(Debug, Clone, Default)]
pub struct SimulatedServo {
    last: Arc<AtomicU32>,
}

impl SimulatedServo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_pulse_width(&self) -> u32 {
        self.last.load(Ordering::Acquire)
    }
}

impl ActuatorPort for SimulatedServo {
    fn set_duty(&mut self, duty: DutyCycle) -> Result<()> {
        info!("[sim] servo -> {}us", duty.pulse_width());
        self.last.store(duty.pulse_width(), Ordering::Release);
        Ok(())
    }
}
