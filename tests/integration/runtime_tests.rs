//! Tests for the async glue: the periodic cycle task and the inbound
//! channel feeding the override task.

use std::sync::Arc;
use std::time::Duration;

use futures_lite::future;

use mixvalve::app::gateway::OverrideGateway;
use mixvalve::app::runtime::{InboundChannel, cycle_loop, forward_inbound, override_loop};
use mixvalve::app::service::CycleDriver;
use mixvalve::control::{ControlState, DutyBounds};
use mixvalve::topics;

use crate::mock_hw::{Journal, MockLed, MockSensors, MockServo, MockTelemetry, PortCall};

/// Run the override task until it has drained the channel and parked.
fn drain(channel: &InboundChannel, gateway: OverrideGateway<MockServo>) {
    future::block_on(future::or(override_loop(channel, gateway), async {
        for _ in 0..8 {
            future::yield_now().await;
        }
    }));
}

#[test]
fn queued_messages_are_applied_in_order() {
    let channel = InboundChannel::new();
    let journal = Journal::new();
    let state = Arc::new(ControlState::new(60.0, 40.0));
    let gateway = OverrideGateway::new(MockServo::new(&journal), Arc::clone(&state));

    forward_inbound(&channel, topics::SERVO, b"1234").unwrap();
    forward_inbound(&channel, topics::BOTTOM_TEMP, b"oops").unwrap();
    forward_inbound(&channel, topics::SERVO, b"900").unwrap();
    forward_inbound(&channel, topics::MIDDLE_TEMP, b"58").unwrap();

    drain(&channel, gateway);

    assert_eq!(journal.duties(), vec![1230, 900]);
    assert_eq!(state.get().middle, 58.0);
    assert_eq!(state.get().bottom, 40.0);
    assert!(channel.is_empty());
}

#[test]
fn cycle_task_runs_once_per_period() {
    let journal = Journal::new();
    let driver = CycleDriver::new(
        MockSensors::new(&journal, &[50.0]),
        MockServo::new(&journal),
        MockTelemetry::new(&journal),
        MockLed::new(&journal),
        Arc::new(ControlState::new(60.0, 40.0)),
        DutyBounds {
            full_close: 2010,
            full_open: 850,
        },
    );

    // 10 ms period for 105 ms: cycles at 0, 10, .., 100 ms
    future::block_on(future::or(
        cycle_loop(driver, Duration::from_millis(10)),
        async {
            async_io_mini::Timer::after(Duration::from_millis(105)).await;
        },
    ));

    let cycles = journal
        .calls()
        .iter()
        .filter(|c| **c == PortCall::Sample)
        .count();
    assert!(
        (5..=12).contains(&cycles),
        "expected about 11 cycles, got {cycles}"
    );
    assert!(journal.duties().iter().all(|d| *d == 1720));
}
