//! Override gateway — applies bus commands outside the cycle cadence.
//!
//! Servo overrides go straight to the actuator and hold until the next
//! cycle writes its own value.  Reference overrides replace one field of
//! the shared [`ControlState`] and take effect on the next cycle.

use std::sync::Arc;

use log::{info, warn};

use crate::control::ControlState;
use crate::error::Result;

use super::commands::OverrideCommand;
use super::ports::ActuatorPort;

pub struct OverrideGateway<A> {
    actuator: A,
    state: Arc<ControlState>,
    handled: u64,
    rejected: u64,
}

impl<A: ActuatorPort> OverrideGateway<A> {
    pub fn new(actuator: A, state: Arc<ControlState>) -> Self {
        Self {
            actuator,
            state,
            handled: 0,
            rejected: 0,
        }
    }

    /// Parse and apply one message.  `Ok(None)` for foreign topics.
    pub fn handle(&mut self, topic: &str, payload: &[u8]) -> Result<Option<OverrideCommand>> {
        let Some(cmd) = OverrideCommand::parse(topic, payload)? else {
            return Ok(None);
        };
        match cmd {
            OverrideCommand::ServoDuty(duty) => {
                info!("Override: servo duty {}", duty);
                self.actuator.set_duty(duty)?;
            }
            OverrideCommand::MiddleTemp(v) => {
                info!("Override: middle temp {}", v);
                self.state.set_middle(v);
            }
            OverrideCommand::BottomTemp(v) => {
                info!("Override: bottom temp {}", v);
                self.state.set_bottom(v);
            }
        }
        Ok(Some(cmd))
    }

    /// [`handle`](Self::handle) with every failure logged and swallowed,
    /// so one bad message never stops the dispatcher.
    pub fn dispatch(&mut self, topic: &str, payload: &[u8]) {
        match self.handle(topic, payload) {
            Ok(Some(_)) => self.handled += 1,
            Ok(None) => info!("Received a message on unhandled topic [{}]", topic),
            Err(e) => {
                self.rejected += 1;
                warn!("Override on [{}] rejected: {}", topic, e);
            }
        }
    }

    /// Commands applied successfully.
    pub fn handled_count(&self) -> u64 {
        self.handled
    }

    /// Messages dropped because of a parse or actuator error.
    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }
}
