//! Inbound override commands.
//!
//! These represent actions requested over the message bus that the
//! [`OverrideGateway`](super::gateway::OverrideGateway) applies outside
//! the cycle cadence.

use crate::control::DutyCycle;
use crate::error::{PayloadError, Result};
use crate::{pins, topics};

/// Commands that remote clients can send into the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverrideCommand {
    /// Drive the servo directly, bypassing the controller.
    ServoDuty(DutyCycle),

    /// Replace the middle reference temperature.
    MiddleTemp(f64),

    /// Replace the bottom reference temperature.
    BottomTemp(f64),
}

impl OverrideCommand {
    /// Parse a bus message.  `Ok(None)` for topics this controller does
    /// not handle.
    pub fn parse(topic: &str, payload: &[u8]) -> Result<Option<Self>> {
        let cmd = match topic {
            topics::SERVO => Self::ServoDuty(parse_servo(payload)?),
            topics::MIDDLE_TEMP => Self::MiddleTemp(parse_temperature(payload)?),
            topics::BOTTOM_TEMP => Self::BottomTemp(parse_temperature(payload)?),
            _ => return Ok(None),
        };
        Ok(Some(cmd))
    }
}

fn payload_text(payload: &[u8]) -> core::result::Result<&str, PayloadError> {
    core::str::from_utf8(payload)
        .map(str::trim)
        .map_err(|_| PayloadError::NotUtf8)
}

fn parse_integer(payload: &[u8]) -> core::result::Result<u32, PayloadError> {
    payload_text(payload)?
        .parse()
        .map_err(|_| PayloadError::NotInteger)
}

/// 0 (stop pulses) or a width inside the servo range, quantized.
fn parse_servo(payload: &[u8]) -> core::result::Result<DutyCycle, PayloadError> {
    let duty = DutyCycle::from_raw(parse_integer(payload)?);
    let width = duty.pulse_width();
    if width != 0 && !(pins::SERVO_PULSE_MIN..=pins::SERVO_PULSE_MAX).contains(&width) {
        return Err(PayloadError::OutOfRange);
    }
    Ok(duty)
}

fn parse_temperature(payload: &[u8]) -> core::result::Result<f64, PayloadError> {
    let value: f64 = payload_text(payload)?
        .parse()
        .map_err(|_| PayloadError::NotNumber)?;
    if !value.is_finite() {
        return Err(PayloadError::NonFinite);
    }
    Ok(value)
}
