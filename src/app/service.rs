//! Cycle driver — the periodic control loop.
//!
//! [`CycleDriver`] owns the sensor, actuator, telemetry and busy-LED
//! ports plus a handle on the shared [`ControlState`].  Each call to
//! [`run_cycle`](CycleDriver::run_cycle) performs one
//! sample → compute → actuate → report pass.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ TelemetryPort
//!                 │      CycleDriver        │
//! ActuatorPort ◀──│  mixing law · quantize  │◀── ControlState (Arc)
//!                 └────────────────────────┘
//! ```
//!
//! Temperatures are published as soon as they are sampled, so the
//! dashboard keeps updating while the valve cannot be driven.  Later
//! failures end the cycle early, skip the ratio report and are returned
//! in the [`CycleOutcome`]; nothing propagates past the cycle boundary.

use std::sync::Arc;

use log::{debug, warn};

use crate::control::{self, ControlState, DutyBounds};

use super::events::{CycleOutcome, CyclePhase};
use super::ports::{ActuatorPort, IndicatorPort, SensorPort, TelemetryPort};

/// The cycle driver orchestrates one control pass at a time.
pub struct CycleDriver<S, A, T, L> {
    sensors: S,
    actuator: A,
    telemetry: T,
    busy: L,
    state: Arc<ControlState>,
    bounds: DutyBounds,
    phase: CyclePhase,
    cycle_count: u64,
    failed_count: u64,
}

impl<S, A, T, L> CycleDriver<S, A, T, L>
where
    S: SensorPort,
    A: ActuatorPort,
    T: TelemetryPort,
    L: IndicatorPort,
{
    pub fn new(
        sensors: S,
        actuator: A,
        telemetry: T,
        busy: L,
        state: Arc<ControlState>,
        bounds: DutyBounds,
    ) -> Self {
        Self {
            sensors,
            actuator,
            telemetry,
            busy,
            state,
            bounds,
            phase: CyclePhase::Idle,
            cycle_count: 0,
            failed_count: 0,
        }
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full cycle.  The busy indicator is lit for its duration,
    /// whatever the outcome.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.cycle_count += 1;
        self.busy.set(true);
        let outcome = self.run_phases();
        self.phase = CyclePhase::Idle;
        self.busy.set(false);

        match &outcome {
            CycleOutcome::Completed {
                decision,
                sensor_count,
            } => debug!(
                "Cycle {} | sensors={} | control={:.2} | ratio={:.3} | duty={}",
                self.cycle_count,
                sensor_count,
                decision.control_temp,
                decision.ratio.value(),
                decision.duty
            ),
            CycleOutcome::Failed { phase, error } => {
                self.failed_count += 1;
                warn!(
                    "Cycle {} failed while {:?}: {}",
                    self.cycle_count, phase, error
                );
            }
        }
        outcome
    }

    fn run_phases(&mut self) -> CycleOutcome {
        // 1. Sample, and report temperatures whatever happens next
        self.phase = CyclePhase::Sampling;
        let readings = self.sensors.read_all();
        self.telemetry.publish_readings(&readings);

        // 2. Compute against whatever references are current right now
        self.phase = CyclePhase::Computing;
        let decision = match control::compute(&readings, self.state.get(), self.bounds) {
            Ok(d) => d,
            Err(error) => return self.fail(error),
        };

        // 3. Actuate
        self.phase = CyclePhase::Actuating;
        if let Err(error) = self.actuator.set_duty(decision.duty) {
            return self.fail(error);
        }

        // 4. Report the ratio that was applied
        self.phase = CyclePhase::Reporting;
        self.telemetry.publish_ratio(decision.ratio);

        CycleOutcome::Completed {
            decision,
            sensor_count: readings.len(),
        }
    }

    fn fail(&self, error: crate::error::Error) -> CycleOutcome {
        CycleOutcome::Failed {
            phase: self.phase,
            error,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Phase the driver is in; `Idle` between cycles.
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Cycles started since construction.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Cycles that ended early.
    pub fn failed_count(&self) -> u64 {
        self.failed_count
    }
}
