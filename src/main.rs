//! mixvalve — 4-way mixing valve controller.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                     │
//! │                                                               │
//! │  Hardware (pigpio | simulated)          MQTT (rumqttc)        │
//! │  sensors · servo · LEDs                 telemetry · session   │
//! │                                                               │
//! │  ─────────────── Port Trait Boundary ───────────────────      │
//! │                                                               │
//! │  ┌──────────────────────────┐   ┌──────────────────────────┐  │
//! │  │ CycleDriver (periodic)   │   │ OverrideGateway (on msg) │  │
//! │  └────────────┬─────────────┘   └────────────┬─────────────┘  │
//! │               └──────── ControlState ────────┘                │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration is layered: built-in defaults, then an optional JSON
//! file (`--config`), then command-line flags and environment variables.
#![deny(unused_must_use)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use mixvalve::adapters::hardware;
use mixvalve::adapters::mqtt::{self, MqttTelemetry};
use mixvalve::app::gateway::OverrideGateway;
use mixvalve::app::runtime::{self, INBOUND};
use mixvalve::app::service::CycleDriver;
use mixvalve::config::{Backend, ValveConfig};
use mixvalve::control::ControlState;

/// Drive a 4-way mixing valve from 1-Wire temperatures, reporting over MQTT.
#[derive(Parser, Debug)]
#[command(name = "mixvalve", version, long_about = None)]
struct Options {
    /// JSON config file; its fields override the built-in defaults
    #[arg(short, long, env = "MIXVALVE_CONFIG")]
    config: Option<PathBuf>,

    /// Hardware backend
    #[arg(long, env = "BACKEND", value_enum)]
    backend: Option<Backend>,

    /// Hostname of the pigpio daemon
    #[arg(long, env = "PIGPIO_HOSTNAME")]
    pigpio_hostname: Option<String>,

    #[arg(long, env = "PIGPIO_PORT")]
    pigpio_port: Option<u16>,

    #[arg(long, env = "MQTT_USERNAME")]
    mqtt_username: Option<String>,

    #[arg(long, env = "MQTT_PASSWORD", hide_env_values = true)]
    mqtt_password: Option<String>,

    #[arg(long, env = "MQTT_HOSTNAME")]
    mqtt_hostname: Option<String>,

    #[arg(long, env = "MQTT_PORT")]
    mqtt_port: Option<u16>,

    #[arg(long, env = "MQTT_CLIENT_ID")]
    mqtt_client_id: Option<String>,

    /// BCM pin driving the valve servo
    #[arg(long, env = "SERVO_BCM_PIN")]
    servo_bcm_pin: Option<u32>,

    /// BCM pin of the ready (green) LED
    #[arg(long, env = "GREEN_LED_BCM_PIN")]
    green_led_bcm_pin: Option<u32>,

    /// BCM pin of the busy (red) LED
    #[arg(long, env = "RED_LED_BCM_PIN")]
    red_led_bcm_pin: Option<u32>,

    /// Directory holding the 1-Wire device folders
    #[arg(long, env = "TEMP_SENSOR_PATH")]
    temp_sensor_path: Option<String>,

    /// Seconds between control cycles
    #[arg(long, env = "TEMP_MEASURE_PERIOD_SECONDS")]
    temp_measure_period_seconds: Option<u64>,

    #[arg(long, env = "INITIAL_MIDDLE_TEMP", allow_negative_numbers = true)]
    initial_middle_temp: Option<f64>,

    #[arg(long, env = "INITIAL_BOTTOM_TEMP", allow_negative_numbers = true)]
    initial_bottom_temp: Option<f64>,

    /// Servo pulse width at which the valve is fully closed
    #[arg(long, env = "VALVE_FULL_CLOSE_AT")]
    valve_full_close_at: Option<u32>,

    /// Servo pulse width at which the valve is fully open
    #[arg(long, env = "VALVE_FULL_OPEN_AT")]
    valve_full_open_at: Option<u32>,

    /// Debug-level logging
    #[arg(short, long, env = "VERBOSE")]
    verbose: bool,
}

impl Options {
    fn apply(self, config: &mut ValveConfig) {
        if let Some(v) = self.backend {
            config.backend = v;
        }
        if let Some(v) = self.pigpio_hostname {
            config.pigpio_hostname = v;
        }
        if let Some(v) = self.pigpio_port {
            config.pigpio_port = v;
        }
        if let Some(v) = self.mqtt_username {
            config.mqtt_username = v;
        }
        if let Some(v) = self.mqtt_password {
            config.mqtt_password = v;
        }
        if let Some(v) = self.mqtt_hostname {
            config.mqtt_hostname = v;
        }
        if let Some(v) = self.mqtt_port {
            config.mqtt_port = v;
        }
        if let Some(v) = self.mqtt_client_id {
            config.mqtt_client_id = v;
        }
        if let Some(v) = self.servo_bcm_pin {
            config.servo_bcm_pin = v;
        }
        if let Some(v) = self.green_led_bcm_pin {
            config.green_led_bcm_pin = v;
        }
        if let Some(v) = self.red_led_bcm_pin {
            config.red_led_bcm_pin = v;
        }
        if let Some(v) = self.temp_sensor_path {
            config.temp_sensor_path = v;
        }
        if let Some(v) = self.temp_measure_period_seconds {
            config.temp_measure_period_seconds = v;
        }
        if let Some(v) = self.initial_middle_temp {
            config.initial_middle_temp = v;
        }
        if let Some(v) = self.initial_bottom_temp {
            config.initial_bottom_temp = v;
        }
        if let Some(v) = self.valve_full_close_at {
            config.valve_full_close_at = v;
        }
        if let Some(v) = self.valve_full_open_at {
            config.valve_full_open_at = v;
        }
        config.verbose |= self.verbose;
    }
}

fn load_config(opts: Options) -> Result<ValveConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            ValveConfig::from_json(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => ValveConfig::default(),
    };
    opts.apply(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Inner width of the startup banner box.
const BANNER_WIDTH: usize = 38;

fn banner_title(version: &str) -> String {
    format!("{:<width$}", format!("  mixvalve v{version}"), width = BANNER_WIDTH)
}

fn main() -> Result<()> {
    // ── 1. Configuration and logging ──────────────────────────
    let config = load_config(Options::parse())?;

    env_logger::Builder::from_default_env()
        .filter_level(if config.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    info!("╔{}╗", "═".repeat(BANNER_WIDTH));
    info!("║{}║", banner_title(env!("CARGO_PKG_VERSION")));
    info!("╚{}╝", "═".repeat(BANNER_WIDTH));
    info!("Config: {}", config.redacted_json());

    // ── 2. Hardware backend ───────────────────────────────────
    let hw = hardware::build(&config).with_context(|| {
        format!(
            "connecting to pigpio daemon at {}:{}",
            config.pigpio_hostname, config.pigpio_port
        )
    })?;

    let state = Arc::new(ControlState::new(
        config.initial_middle_temp,
        config.initial_bottom_temp,
    ));

    // ── 3. Message bus ────────────────────────────────────────
    info!(
        "Connecting to MQTT broker {}:{} as '{}'",
        config.mqtt_hostname, config.mqtt_port, config.mqtt_client_id
    );
    let (client, connection) = mqtt::connect(&config);
    let session = mqtt::Session::new(client.clone(), hw.ready_led, &INBOUND);
    mqtt::spawn(connection, session).context("spawning MQTT thread")?;

    // ── 4. Control loop and override gateway ──────────────────
    let driver = CycleDriver::new(
        hw.sensors,
        hw.cycle_servo,
        MqttTelemetry::new(client),
        hw.busy_led,
        Arc::clone(&state),
        config.duty_bounds(),
    );
    let gateway = OverrideGateway::new(hw.override_servo, state);

    runtime::run(driver, config.poll_period(), &INBOUND, gateway);
    Ok(())
}
