//! Mock adapters for integration tests.
//!
//! Every port call lands in one shared, ordered [`Journal`] so tests can
//! assert on what happened and in which order across all ports.  The
//! mocks are handed to the driver by value; tests keep a clone of the
//! journal to inspect afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use mixvalve::app::ports::{ActuatorPort, IndicatorPort, SensorPort, TelemetryPort};
use mixvalve::control::{DutyCycle, MixRatio};
use mixvalve::error::{ActuatorError, Result};
use mixvalve::sensors::Reading;

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum PortCall {
    Sample,
    SetDuty(u32),
    Readings(Vec<f64>),
    Ratio(f64),
    Busy(bool),
}

#[derive(Clone, Default)]
pub struct Journal {
    calls: Rc<RefCell<Vec<PortCall>>>,
}

#[allow(dead_code)]
impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: PortCall) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<PortCall> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn duties(&self) -> Vec<u32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                PortCall::SetDuty(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                PortCall::Ratio(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn published_readings(&self) -> Vec<Vec<f64>> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                PortCall::Readings(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }
}

// ── MockSensors ───────────────────────────────────────────────

/// Returns whatever the test last stored in `readings`.
#[derive(Clone)]
pub struct MockSensors {
    journal: Journal,
    pub readings: Rc<RefCell<Vec<Reading>>>,
}

#[allow(dead_code)]
impl MockSensors {
    pub fn new(journal: &Journal, celsius: &[f64]) -> Self {
        Self {
            journal: journal.clone(),
            readings: Rc::new(RefCell::new(
                celsius.iter().copied().map(Reading::new).collect(),
            )),
        }
    }

    pub fn set(&self, celsius: &[f64]) {
        *self.readings.borrow_mut() = celsius.iter().copied().map(Reading::new).collect();
    }
}

impl SensorPort for MockSensors {
    fn read_all(&mut self) -> Vec<Reading> {
        self.journal.push(PortCall::Sample);
        self.readings.borrow().clone()
    }
}

// ── MockServo ─────────────────────────────────────────────────

pub struct MockServo {
    journal: Journal,
    pub fail_with: Option<ActuatorError>,
}

#[allow(dead_code)]
impl MockServo {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail_with: None,
        }
    }

    pub fn failing(journal: &Journal, error: ActuatorError) -> Self {
        Self {
            journal: journal.clone(),
            fail_with: Some(error),
        }
    }
}

impl ActuatorPort for MockServo {
    fn set_duty(&mut self, duty: DutyCycle) -> Result<()> {
        if let Some(e) = self.fail_with {
            return Err(e.into());
        }
        self.journal.push(PortCall::SetDuty(duty.pulse_width()));
        Ok(())
    }
}

// ── MockTelemetry ─────────────────────────────────────────────

pub struct MockTelemetry {
    journal: Journal,
}

impl MockTelemetry {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

impl TelemetryPort for MockTelemetry {
    fn publish_readings(&mut self, readings: &[Reading]) {
        self.journal
            .push(PortCall::Readings(readings.iter().map(|r| r.celsius).collect()));
    }

    fn publish_ratio(&mut self, ratio: MixRatio) {
        self.journal.push(PortCall::Ratio(ratio.value()));
    }
}

// ── MockLed ───────────────────────────────────────────────────

pub struct MockLed {
    journal: Journal,
}

impl MockLed {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

impl IndicatorPort for MockLed {
    fn set(&mut self, on: bool) {
        self.journal.push(PortCall::Busy(on));
    }
}
