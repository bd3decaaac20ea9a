//! Integration tests for the periodic control cycle.
//!
//! Drive `CycleDriver` against the mock adapters and check the full
//! sample → compute → actuate → report sequence, including how each
//! failure ends the cycle.

use std::sync::Arc;

use mixvalve::app::events::{CycleOutcome, CyclePhase};
use mixvalve::app::service::CycleDriver;
use mixvalve::control::{ControlState, DutyBounds};
use mixvalve::error::{ActuatorError, Error};

use crate::mock_hw::{Journal, MockLed, MockSensors, MockServo, MockTelemetry, PortCall};

const BOUNDS: DutyBounds = DutyBounds {
    full_close: 2010,
    full_open: 850,
};

type Driver = CycleDriver<MockSensors, MockServo, MockTelemetry, MockLed>;

fn make_driver(celsius: &[f64]) -> (Driver, Journal, MockSensors, Arc<ControlState>) {
    let journal = Journal::new();
    let sensors = MockSensors::new(&journal, celsius);
    let state = Arc::new(ControlState::new(60.0, 40.0));
    let driver = CycleDriver::new(
        sensors.clone(),
        MockServo::new(&journal),
        MockTelemetry::new(&journal),
        MockLed::new(&journal),
        Arc::clone(&state),
        BOUNDS,
    );
    (driver, journal, sensors, state)
}

// ── Worked scenarios ──────────────────────────────────────────

#[test]
fn scenario_quarter_mix() {
    let (mut driver, journal, _, _) = make_driver(&[50.0, 45.0, 41.0]);

    let outcome = driver.run_cycle();

    assert!(outcome.is_completed());
    assert_eq!(
        journal.calls(),
        vec![
            PortCall::Busy(true),
            PortCall::Sample,
            PortCall::Readings(vec![50.0, 45.0, 41.0]),
            PortCall::SetDuty(1720),
            PortCall::Ratio(0.25),
            PortCall::Busy(false),
        ]
    );
}

#[test]
fn scenario_three_quarter_mix() {
    let (mut driver, journal, _, _) = make_driver(&[70.0]);
    driver.run_cycle();
    assert_eq!(journal.duties(), vec![1140]);
    assert_eq!(journal.ratios(), vec![0.75]);
}

#[test]
fn scenario_hot_supply_clamps_to_full_open() {
    let (mut driver, journal, _, _) = make_driver(&[90.0]);
    let outcome = driver.run_cycle();
    assert_eq!(outcome.decision().map(|d| d.duty.pulse_width()), Some(850));
    assert_eq!(journal.ratios(), vec![1.0]);
}

#[test]
fn cold_supply_clamps_to_full_close() {
    let (mut driver, journal, _, _) = make_driver(&[20.0]);
    driver.run_cycle();
    assert_eq!(journal.duties(), vec![2010]);
    assert_eq!(journal.ratios(), vec![0.0]);
}

// ── Control input selection ───────────────────────────────────

#[test]
fn only_first_reading_drives_the_valve() {
    let (mut driver, journal, sensors, _) = make_driver(&[50.0, 90.0]);
    driver.run_cycle();
    sensors.set(&[50.0, 10.0, 10.0, 10.0]);
    driver.run_cycle();
    assert_eq!(journal.duties(), vec![1720, 1720]);
}

// ── Failure containment ───────────────────────────────────────

#[test]
fn no_readings_skips_actuation_and_ratio() {
    let (mut driver, journal, _, _) = make_driver(&[]);

    let outcome = driver.run_cycle();

    assert_eq!(
        outcome,
        CycleOutcome::Failed {
            phase: CyclePhase::Computing,
            error: Error::InsufficientInput,
        }
    );
    assert_eq!(
        journal.calls(),
        vec![
            PortCall::Busy(true),
            PortCall::Sample,
            PortCall::Readings(vec![]),
            PortCall::Busy(false),
        ]
    );
}

#[test]
fn equal_references_fail_cycle_but_still_report_temperatures() {
    let (mut driver, journal, _, state) = make_driver(&[50.0, 45.0]);
    state.set_middle(40.0);

    let outcome = driver.run_cycle();

    assert!(matches!(
        outcome,
        CycleOutcome::Failed {
            phase: CyclePhase::Computing,
            error: Error::DegenerateRange { .. },
        }
    ));
    assert!(journal.duties().is_empty());
    assert!(journal.ratios().is_empty());
    assert_eq!(journal.published_readings(), vec![vec![50.0, 45.0]]);
    assert_eq!(driver.failed_count(), 1);
}

#[test]
fn failed_cycle_does_not_stop_the_next_one() {
    let (mut driver, journal, sensors, _) = make_driver(&[]);
    assert!(!driver.run_cycle().is_completed());

    sensors.set(&[70.0]);
    assert!(driver.run_cycle().is_completed());
    assert_eq!(journal.duties(), vec![1140]);
    assert_eq!(driver.cycle_count(), 2);
    assert_eq!(driver.failed_count(), 1);
}

#[test]
fn actuator_failure_keeps_busy_led_balanced() {
    let journal = Journal::new();
    let mut driver = CycleDriver::new(
        MockSensors::new(&journal, &[50.0]),
        MockServo::failing(&journal, ActuatorError::Rejected(-8)),
        MockTelemetry::new(&journal),
        MockLed::new(&journal),
        Arc::new(ControlState::new(60.0, 40.0)),
        BOUNDS,
    );

    let outcome = driver.run_cycle();

    assert_eq!(
        outcome,
        CycleOutcome::Failed {
            phase: CyclePhase::Actuating,
            error: Error::Actuator(ActuatorError::Rejected(-8)),
        }
    );
    assert_eq!(journal.calls().last(), Some(&PortCall::Busy(false)));
    assert_eq!(journal.published_readings(), vec![vec![50.0]]);
    assert!(journal.ratios().is_empty());
}

// ── Reference updates ─────────────────────────────────────────

#[test]
fn reference_change_applies_on_next_cycle() {
    let (mut driver, journal, _, state) = make_driver(&[50.0]);
    driver.run_cycle();

    // Bottom 45: ratio (50-45)/((60-45)*2) = 1/6 → 2010 - 193.3 = 1816.7 → 1810
    state.set_bottom(45.0);
    driver.run_cycle();

    assert_eq!(journal.duties(), vec![1720, 1810]);
}

#[test]
fn inverted_references_still_produce_a_ratio() {
    let (mut driver, journal, _, state) = make_driver(&[50.0]);
    state.set_middle(40.0);
    state.set_bottom(60.0);

    // (50-60)/((40-60)*2) = 0.25
    driver.run_cycle();
    assert_eq!(journal.ratios(), vec![0.25]);
    assert_eq!(journal.duties(), vec![1720]);
}
