//! Proportional mixing law for the 4-way valve.
//!
//! The control temperature (reading 0) is placed on a scale between the
//! bottom reference and twice the middle/bottom span, producing the
//! fraction of "bottom" water to blend in.  That fraction is mapped
//! linearly onto the servo pulse range and quantized to the 10 µs steps
//! the servo driver accepts.

use crate::error::{Error, Result};
use crate::sensors::Reading;

use super::state::Setpoints;

/// Servo pulse widths at the two valve extremes.  Either may be larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyBounds {
    pub full_close: u32,
    pub full_open: u32,
}

/// Fraction of bottom-loop water, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct MixRatio(f64);

impl MixRatio {
    /// Clamp an arbitrary ratio into `[0, 1]`.  NaN is not accepted here;
    /// [`mix_ratio`] reports it as a degenerate range first.
    pub fn clamped(raw: f64) -> Self {
        Self(raw.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }
}

/// Quantized servo command.  Always a multiple of 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DutyCycle(u32);

impl DutyCycle {
    /// Round toward zero onto the 10 µs grid.  Negative input saturates to 0.
    pub fn quantize(continuous: f64) -> Self {
        Self(((continuous / 10.0).trunc() * 10.0) as u32)
    }

    /// Quantize an externally supplied integer command.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw / 10 * 10)
    }

    pub fn pulse_width(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for DutyCycle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output of one controller evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub control_temp: f64,
    pub ratio: MixRatio,
    pub duty: DutyCycle,
}

/// Mix ratio for a control temperature against the two references.
pub fn mix_ratio(control_temp: f64, setpoints: Setpoints) -> Result<MixRatio> {
    let Setpoints { middle, bottom } = setpoints;
    if middle == bottom {
        return Err(Error::DegenerateRange { middle, bottom });
    }
    let raw = (control_temp - bottom) / ((middle - bottom) * 2.0);
    if raw.is_nan() {
        return Err(Error::DegenerateRange { middle, bottom });
    }
    Ok(MixRatio::clamped(raw))
}

/// Continuous (unquantized) pulse width for a ratio.
pub fn continuous_duty(ratio: MixRatio, bounds: DutyBounds) -> f64 {
    let close = bounds.full_close as f64;
    let open = bounds.full_open as f64;
    close - ratio.value() * (close - open)
}

/// Full control law: readings + references → ratio → quantized duty.
pub fn compute(readings: &[Reading], setpoints: Setpoints, bounds: DutyBounds) -> Result<Decision> {
    let control_temp = readings.first().ok_or(Error::InsufficientInput)?.celsius;
    let ratio = mix_ratio(control_temp, setpoints)?;
    let duty = DutyCycle::quantize(continuous_duty(ratio, bounds));
    Ok(Decision {
        control_temp,
        ratio,
        duty,
    })
}
