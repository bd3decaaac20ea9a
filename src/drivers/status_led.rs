//! Single-colour status LEDs.
//!
//! Two are fitted: green lights once the bus session is up, red is lit
//! while a control cycle runs.  Both are plain GPIO outputs; a failed
//! write is logged and otherwise ignored.

use embedded_hal::digital::{Error as _, OutputPin};
use log::warn;

use crate::app::ports::IndicatorPort;

pub struct StatusLed<P> {
    pin: P,
    name: &'static str,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P, name: &'static str) -> Self {
        Self {
            pin,
            name,
            lit: false,
        }
    }

    /// Last level successfully written.
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl<P: OutputPin> IndicatorPort for StatusLed<P> {
    fn set(&mut self, on: bool) {
        let res = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match res {
            Ok(()) => self.lit = on,
            Err(e) => warn!("{} LED write failed: {:?}", self.name, e.kind()),
        }
    }
}
