//! MQTT adapter — telemetry out, override messages in.
//!
//! Uses the blocking `rumqttc` client.  [`MqttTelemetry`] implements
//! [`TelemetryPort`] by queueing publishes on the client; the
//! connection itself is polled on a dedicated thread
//! ([`spawn`]) where a [`Session`] reacts to each event:
//!
//! - `ConnAck`: (re)subscribe to the override topics, light the ready LED
//! - `Publish`: forward to the gateway through the inbound channel
//! - connection error: ready LED off; rumqttc reconnects on the next poll

use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};
use rumqttc::{Client, Connection, ConnectionError, Event, MqttOptions, Packet, QoS};

use crate::app::ports::{IndicatorPort, TelemetryPort};
use crate::app::runtime::{self, InboundChannel};
use crate::config::ValveConfig;
use crate::control::MixRatio;
use crate::sensors::Reading;
use crate::topics;

/// Outgoing requests buffered by the client before `try_publish` fails.
const REQUEST_CAPACITY: usize = 16;
const KEEP_ALIVE: Duration = Duration::from_secs(60);
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

pub fn options(config: &ValveConfig) -> MqttOptions {
    let mut opts = MqttOptions::new(
        config.mqtt_client_id.clone(),
        config.mqtt_hostname.clone(),
        config.mqtt_port,
    );
    opts.set_credentials(config.mqtt_username.clone(), config.mqtt_password.clone());
    opts.set_keep_alive(KEEP_ALIVE);
    opts
}

/// Create the client handle and its (not yet polled) connection.
pub fn connect(config: &ValveConfig) -> (Client, Connection) {
    Client::new(options(config), REQUEST_CAPACITY)
}

// ── Telemetry ────────────────────────────────────────────────

/// Queues publishes without blocking.  A full queue or a closed
/// connection costs that one message; the cycle carries on.
pub struct MqttTelemetry {
    client: Client,
    dropped: u64,
}

impl MqttTelemetry {
    pub fn new(client: Client) -> Self {
        Self { client, dropped: 0 }
    }

    /// Messages that could not be queued since construction.
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    fn publish(&mut self, topic: &str, payload: String) {
        if let Err(e) = self
            .client
            .try_publish(topic, QoS::AtMostOnce, false, payload)
        {
            self.dropped += 1;
            warn!("Publish to [{}] failed: {}", topic, e);
        }
    }
}

impl TelemetryPort for MqttTelemetry {
    fn publish_readings(&mut self, readings: &[Reading]) {
        for (index, reading) in readings.iter().enumerate() {
            self.publish(
                &topics::temperature(index),
                topics::temperature_payload(reading.celsius),
            );
        }
    }

    fn publish_ratio(&mut self, ratio: MixRatio) {
        self.publish(topics::OPEN_VALVE, topics::open_valve_payload(ratio.percent()));
    }
}

// ── Inbound session ──────────────────────────────────────────

pub struct Session<'a, L> {
    client: Client,
    ready: L,
    inbound: &'a InboundChannel,
}

impl<'a, L: IndicatorPort> Session<'a, L> {
    pub fn new(client: Client, ready: L, inbound: &'a InboundChannel) -> Self {
        Self {
            client,
            ready,
            inbound,
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Incoming(Packet::ConnAck(ack)) => {
                info!("MQTT connected ({:?})", ack.code);
                self.subscribe();
                self.ready.set(true);
            }
            Event::Incoming(Packet::Publish(publish)) => {
                debug!(
                    "Received [{}] {:?}",
                    publish.topic,
                    String::from_utf8_lossy(&publish.payload)
                );
                if let Err(e) = runtime::forward_inbound(self.inbound, &publish.topic, &publish.payload)
                {
                    warn!("Dropped message on [{}]: {}", publish.topic, e);
                }
            }
            Event::Incoming(Packet::Disconnect) => {
                warn!("MQTT broker closed the session");
                self.ready.set(false);
            }
            _ => {}
        }
    }

    pub fn connection_lost(&mut self, error: &ConnectionError) {
        warn!("MQTT connection error: {}", error);
        self.ready.set(false);
    }

    fn subscribe(&mut self) {
        for topic in topics::SUBSCRIPTIONS {
            match self.client.try_subscribe(topic, QoS::AtLeastOnce) {
                Ok(()) => debug!("Subscribed to [{}]", topic),
                Err(e) => warn!("Subscribe to [{}] failed: {}", topic, e),
            }
        }
    }
}

/// Poll the connection forever, feeding every event to `session`.
pub fn run_event_loop<L: IndicatorPort>(mut connection: Connection, mut session: Session<'_, L>) {
    for notification in connection.iter() {
        match notification {
            Ok(event) => session.handle_event(&event),
            Err(e) => {
                session.connection_lost(&e);
                thread::sleep(RECONNECT_DELAY);
            }
        }
    }
}

/// Run [`run_event_loop`] on its own named thread.
pub fn spawn<L>(
    connection: Connection,
    session: Session<'static, L>,
) -> std::io::Result<JoinHandle<()>>
where
    L: IndicatorPort + Send + 'static,
{
    info!("Spawning 'mqtt-io'");
    thread::Builder::new()
        .name("mqtt-io".into())
        .spawn(move || run_event_loop(connection, session))
}
