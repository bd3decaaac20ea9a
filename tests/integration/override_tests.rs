//! Integration tests for the override path: bus message → gateway →
//! servo or shared references, interleaved with control cycles.

use std::sync::Arc;

use mixvalve::app::commands::OverrideCommand;
use mixvalve::app::gateway::OverrideGateway;
use mixvalve::app::service::CycleDriver;
use mixvalve::control::{ControlState, DutyBounds, DutyCycle, Setpoints};
use mixvalve::error::{Error, PayloadError};
use mixvalve::topics;

use crate::mock_hw::{Journal, MockLed, MockSensors, MockServo, MockTelemetry};

const BOUNDS: DutyBounds = DutyBounds {
    full_close: 2010,
    full_open: 850,
};

fn make_gateway() -> (OverrideGateway<MockServo>, Journal, Arc<ControlState>) {
    let journal = Journal::new();
    let state = Arc::new(ControlState::new(60.0, 40.0));
    let gateway = OverrideGateway::new(MockServo::new(&journal), Arc::clone(&state));
    (gateway, journal, state)
}

#[test]
fn servo_override_is_quantized_and_applied_immediately() {
    let (mut gateway, journal, _) = make_gateway();

    let cmd = gateway.handle(topics::SERVO, b"1234").unwrap();

    assert_eq!(cmd, Some(OverrideCommand::ServoDuty(DutyCycle::from_raw(1230))));
    assert_eq!(journal.duties(), vec![1230]);
}

#[test]
fn servo_override_holds_until_next_cycle_writes() {
    let journal = Journal::new();
    let state = Arc::new(ControlState::new(60.0, 40.0));
    let mut driver = CycleDriver::new(
        MockSensors::new(&journal, &[50.0]),
        MockServo::new(&journal),
        MockTelemetry::new(&journal),
        MockLed::new(&journal),
        Arc::clone(&state),
        BOUNDS,
    );
    let mut gateway = OverrideGateway::new(MockServo::new(&journal), state);

    driver.run_cycle();
    gateway.dispatch(topics::SERVO, b"1234");
    assert_eq!(journal.duties(), vec![1720, 1230]);

    driver.run_cycle();
    assert_eq!(journal.duties(), vec![1720, 1230, 1720]);
}

#[test]
fn out_of_range_servo_override_never_reaches_the_servo() {
    let (mut gateway, journal, _) = make_gateway();

    assert_eq!(
        gateway.handle(topics::SERVO, b"99999"),
        Err(Error::PayloadParse(PayloadError::OutOfRange))
    );
    gateway.dispatch(topics::SERVO, b"0");

    assert_eq!(journal.duties(), vec![0], "0 stops pulses and is passed through");
    assert_eq!(gateway.rejected_count(), 0);
    assert_eq!(gateway.handled_count(), 1);
}

#[test]
fn reference_overrides_replace_one_field_each() {
    let (mut gateway, journal, state) = make_gateway();

    gateway.dispatch(topics::MIDDLE_TEMP, b"65.5");
    assert_eq!(
        state.get(),
        Setpoints {
            middle: 65.5,
            bottom: 40.0
        }
    );

    gateway.dispatch(topics::BOTTOM_TEMP, b" 35 \n");
    assert_eq!(state.get().bottom, 35.0);

    assert!(journal.duties().is_empty(), "references never touch the servo");
    assert_eq!(gateway.handled_count(), 2);
}

#[test]
fn malformed_payloads_leave_state_untouched() {
    let (mut gateway, journal, state) = make_gateway();
    let before = state.get();

    assert_eq!(
        gateway.handle(topics::SERVO, b"abc"),
        Err(Error::PayloadParse(PayloadError::NotInteger))
    );
    assert_eq!(
        gateway.handle(topics::SERVO, b"-100"),
        Err(Error::PayloadParse(PayloadError::NotInteger))
    );
    assert_eq!(
        gateway.handle(topics::MIDDLE_TEMP, b"warm"),
        Err(Error::PayloadParse(PayloadError::NotNumber))
    );
    assert_eq!(
        gateway.handle(topics::BOTTOM_TEMP, b"NaN"),
        Err(Error::PayloadParse(PayloadError::NonFinite))
    );
    assert_eq!(
        gateway.handle(topics::BOTTOM_TEMP, &[0xff, 0xfe]),
        Err(Error::PayloadParse(PayloadError::NotUtf8))
    );

    assert_eq!(state.get(), before);
    assert!(journal.duties().is_empty());
}

#[test]
fn bad_message_does_not_block_later_ones() {
    let (mut gateway, journal, state) = make_gateway();

    gateway.dispatch(topics::SERVO, b"not a number");
    gateway.dispatch(topics::MIDDLE_TEMP, b"62");
    gateway.dispatch(topics::SERVO, b"1500");

    assert_eq!(gateway.rejected_count(), 1);
    assert_eq!(gateway.handled_count(), 2);
    assert_eq!(state.get().middle, 62.0);
    assert_eq!(journal.duties(), vec![1500]);
}

#[test]
fn foreign_topics_are_ignored() {
    let (mut gateway, journal, state) = make_gateway();
    let before = state.get();

    assert_eq!(gateway.handle("home/other", b"1").unwrap(), None);
    gateway.dispatch(topics::OPEN_VALVE, b"50.0%");

    assert_eq!(state.get(), before);
    assert!(journal.calls().is_empty());
    assert_eq!(gateway.rejected_count(), 0);
}
