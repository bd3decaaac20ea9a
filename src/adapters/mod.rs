//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                  | Connects to              |
//! |------------|-----------------------------|--------------------------|
//! | `hardware` | SensorPort, ActuatorPort,   | pigpio daemon or         |
//! |            | IndicatorPort               | in-memory simulation     |
//! | `mqtt`     | TelemetryPort               | MQTT broker (rumqttc)    |

pub mod hardware;
pub mod mqtt;
