//! `embedded-hal` output pins.
//!
//! [`PigpioPin`] writes levels through the daemon; [`SimulatedPin`]
//! keeps the level in memory and shares it through a cloneable handle so
//! tests and the simulated backend can observe it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{ErrorType, OutputPin};

use super::pigpio::{PigpioClient, PigpioError};

pub struct PigpioPin {
    client: PigpioClient,
    gpio: u32,
}

impl PigpioPin {
    pub fn new(client: PigpioClient, gpio: u32) -> Self {
        Self { client, gpio }
    }
}

impl ErrorType for PigpioPin {
    type Error = PigpioError;
}

impl OutputPin for PigpioPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.client.write(self.gpio, false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.client.write(self.gpio, true)
    }
}

// ── Simulation ───────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SimulatedPin {
    level: Arc<AtomicBool>,
}

impl SimulatedPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.level.load(Ordering::Acquire)
    }
}

impl ErrorType for SimulatedPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for SimulatedPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.store(false, Ordering::Release);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.store(true, Ordering::Release);
        Ok(())
    }
}
