//! Async tasks for the cycle driver and the override gateway.
//!
//! Both run on one `edge-executor` [`LocalExecutor`] driven by
//! `futures_lite::future::block_on`.  The MQTT connection lives on its
//! own thread and hands inbound publishes over through [`INBOUND`], a
//! bounded `embassy-sync` channel; the gateway task wakes as soon as a
//! message lands there.
//!
//! ```text
//!  ┌──────────────┐ InboundMessage ┌──────────────────────────────────┐
//!  │ MQTT thread  │───────────────▶│  LocalExecutor                    │
//!  │ (rumqttc)    │                │  ┌─────────────┐ ┌─────────────┐ │
//!  └──────────────┘                │  │ cycle_loop  │ │override_loop│ │
//!                                  │  │ fixed period│ │ wake-on-msg │ │
//!                                  │  └─────────────┘ └─────────────┘ │
//!                                  └──────────────────────────────────┘
//! ```
//!
//! The cycle's sleep holds nothing, so overrides are applied between
//! cycles without waiting for the next one.

use core::time::Duration;
use std::time::Instant;

use edge_executor::LocalExecutor;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::info;

use crate::error::{CommsError, Error, PayloadError};

use super::gateway::OverrideGateway;
use super::ports::{ActuatorPort, IndicatorPort, SensorPort, TelemetryPort};
use super::service::CycleDriver;

pub const TOPIC_CAP: usize = 64;
pub const PAYLOAD_CAP: usize = 64;

/// Channel depth for inbound override messages.
const INBOUND_DEPTH: usize = 16;

// ── Inbound channel ──────────────────────────────────────────

/// A bus message waiting for the gateway.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub topic: heapless::String<TOPIC_CAP>,
    pub payload: heapless::Vec<u8, PAYLOAD_CAP>,
}

impl InboundMessage {
    pub fn new(topic: &str, payload: &[u8]) -> Result<Self, PayloadError> {
        let mut t = heapless::String::new();
        t.push_str(topic).map_err(|_| PayloadError::TooLong)?;
        let p = heapless::Vec::from_slice(payload).map_err(|_| PayloadError::TooLong)?;
        Ok(Self {
            topic: t,
            payload: p,
        })
    }
}

pub type InboundChannel = Channel<CriticalSectionRawMutex, InboundMessage, INBOUND_DEPTH>;

/// Inbound override channel: MQTT thread → gateway task.
pub static INBOUND: InboundChannel = Channel::new();

/// Queue a bus message for the gateway without blocking the caller.
pub fn forward_inbound(channel: &InboundChannel, topic: &str, payload: &[u8]) -> Result<(), Error> {
    let msg = InboundMessage::new(topic, payload)?;
    channel
        .try_send(msg)
        .map_err(|_| CommsError::InboundQueueFull.into())
}

// ── Cadence ──────────────────────────────────────────────────

/// Next cycle start on the fixed grid `previous + k * period`, strictly
/// after `now`.  A cycle that overran lands on the following slot instead
/// of firing a burst of catch-up cycles.
pub fn next_deadline(previous: Instant, period: Duration, now: Instant) -> Instant {
    if period.is_zero() {
        return now;
    }
    let mut next = previous + period;
    while next <= now {
        next += period;
    }
    next
}

// ── Tasks ────────────────────────────────────────────────────

/// Periodic task: one cycle per `period`, forever.
pub async fn cycle_loop<S, A, T, L>(mut driver: CycleDriver<S, A, T, L>, period: Duration)
where
    S: SensorPort,
    A: ActuatorPort,
    T: TelemetryPort,
    L: IndicatorPort,
{
    let mut deadline = Instant::now();
    loop {
        driver.run_cycle();
        let now = Instant::now();
        deadline = next_deadline(deadline, period, now);
        async_io_mini::Timer::after(deadline.saturating_duration_since(now)).await;
    }
}

/// Message task: applies each inbound message as soon as it arrives.
pub async fn override_loop<A: ActuatorPort>(
    inbound: &InboundChannel,
    mut gateway: OverrideGateway<A>,
) {
    loop {
        let msg = inbound.receive().await;
        gateway.dispatch(&msg.topic, &msg.payload);
    }
}

/// Run both tasks on the calling thread until the process is stopped.
pub fn run<S, A, T, L, G>(
    driver: CycleDriver<S, A, T, L>,
    period: Duration,
    inbound: &InboundChannel,
    gateway: OverrideGateway<G>,
) where
    S: SensorPort,
    A: ActuatorPort,
    T: TelemetryPort,
    L: IndicatorPort,
    G: ActuatorPort,
{
    let executor: LocalExecutor<'_, 4> = LocalExecutor::new();

    executor.spawn(cycle_loop(driver, period)).detach();
    executor.spawn(override_loop(inbound, gateway)).detach();

    info!("Control loop started (period {}s)", period.as_secs_f32());

    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
}
