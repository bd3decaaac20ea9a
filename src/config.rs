//! System configuration parameters
//!
//! All tunable parameters for the valve controller.  Loaded once at
//! startup (defaults, then an optional JSON file, then command-line and
//! environment overrides) and immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::control::mixing::DutyBounds;
use crate::error::Error;
use crate::pins;

/// Which hardware backend drives sensors, servo and LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Remote pigpio daemon (real hardware).
    Pigpio,
    /// Local sensor directory, logging servo and in-memory LEDs.
    Simulated,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValveConfig {
    // --- Hardware ---
    pub backend: Backend,
    /// Hostname of the pigpio daemon
    pub pigpio_hostname: String,
    pub pigpio_port: u16,
    pub servo_bcm_pin: u32,
    pub green_led_bcm_pin: u32,
    pub red_led_bcm_pin: u32,

    // --- Sensors ---
    /// Directory holding the 1-Wire `28-*` device folders
    pub temp_sensor_path: String,
    /// Delay between control cycles (seconds)
    pub temp_measure_period_seconds: u64,

    // --- Control law ---
    pub initial_middle_temp: f64,
    pub initial_bottom_temp: f64,
    /// Duty cycle at which the valve is fully closed
    pub valve_full_close_at: u32,
    /// Duty cycle at which the valve is fully open
    pub valve_full_open_at: u32,

    // --- Message bus ---
    pub mqtt_hostname: String,
    pub mqtt_port: u16,
    pub mqtt_username: String,
    pub mqtt_password: String,
    pub mqtt_client_id: String,

    pub verbose: bool,
}

impl Default for ValveConfig {
    fn default() -> Self {
        Self {
            // Hardware
            backend: Backend::Pigpio,
            pigpio_hostname: "pigpiod".into(),
            pigpio_port: pins::PIGPIO_PORT,
            servo_bcm_pin: pins::SERVO_BCM,
            green_led_bcm_pin: pins::GREEN_LED_BCM,
            red_led_bcm_pin: pins::RED_LED_BCM,

            // Sensors
            temp_sensor_path: "/sys/bus/w1/devices".into(),
            temp_measure_period_seconds: 5,

            // Control law
            initial_middle_temp: 60.0,
            initial_bottom_temp: 40.0,
            valve_full_close_at: 2010,
            valve_full_open_at: 850,

            // Message bus (credentials must be provided)
            mqtt_hostname: String::new(),
            mqtt_port: 1883,
            mqtt_username: String::new(),
            mqtt_password: String::new(),
            mqtt_client_id: "mixvalve".into(),

            verbose: false,
        }
    }
}


impl ValveConfig {
    /// Load a config file; fields missing from the file keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), Error> {
        if self.mqtt_hostname.is_empty() {
            return Err(Error::Config("mqtt_hostname is required"));
        }
        if self.mqtt_username.is_empty() || self.mqtt_password.is_empty() {
            return Err(Error::Config("mqtt credentials are required"));
        }
        if self.temp_measure_period_seconds == 0 {
            return Err(Error::Config("temp_measure_period_seconds must be > 0"));
        }
        for duty in [self.valve_full_close_at, self.valve_full_open_at] {
            if !(pins::SERVO_PULSE_MIN..=pins::SERVO_PULSE_MAX).contains(&duty) {
                return Err(Error::Config("valve duty bounds must lie within 500..=2500"));
            }
            if duty % 10 != 0 {
                return Err(Error::Config("valve duty bounds must be divisible by 10"));
            }
        }
        if self.initial_middle_temp == self.initial_bottom_temp
            || !self.initial_middle_temp.is_finite()
            || !self.initial_bottom_temp.is_finite()
        {
            return Err(Error::Config(
                "initial middle and bottom temperatures must be finite and differ",
            ));
        }
        for pin in [
            self.servo_bcm_pin,
            self.green_led_bcm_pin,
            self.red_led_bcm_pin,
        ] {
            if pin > pins::MAX_BCM {
                return Err(Error::Config("BCM pin out of range"));
            }
        }
        Ok(())
    }

    pub fn duty_bounds(&self) -> DutyBounds {
        DutyBounds {
            full_close: self.valve_full_close_at,
            full_open: self.valve_full_open_at,
        }
    }

    pub fn poll_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.temp_measure_period_seconds)
    }

    /// JSON rendering for the startup log, password masked.
    pub fn redacted_json(&self) -> String {
        let mut shown = self.clone();
        if !shown.mqtt_password.is_empty() {
            shown.mqtt_password = "***".into();
        }
        serde_json::to_string(&shown).unwrap_or_default()
    }
}
