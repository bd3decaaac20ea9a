//! Hardware adapter — assembles the port implementations for the
//! configured backend.
//!
//! | Backend     | Sensors               | Servo          | LEDs          |
//! |-------------|-----------------------|----------------|---------------|
//! | `pigpio`    | daemon file API       | daemon servo   | daemon GPIO   |
//! | `simulated` | local directory       | in-memory      | in-memory     |
//!
//! The backend is chosen once at startup.  With `pigpio`, failing to reach
//! the daemon is fatal; there is no silent fallback to simulation.

use log::info;

use crate::app::ports::{ActuatorPort, IndicatorPort, SensorPort};
use crate::config::{Backend, ValveConfig};
use crate::drivers::gpio::{PigpioPin, SimulatedPin};
use crate::drivers::pigpio::{PigpioClient, PigpioError};
use crate::drivers::servo::{PigpioServo, SimulatedServo};
use crate::drivers::status_led::StatusLed;
use crate::sensors::bus::{DirectoryW1Bus, PigpioW1Bus};
use crate::sensors::w1::OneWireSensors;

/// Every port the control loop, the override gateway and the MQTT
/// session need.  Both servo handles drive the same output.
pub struct Hardware {
    pub sensors: Box<dyn SensorPort>,
    pub cycle_servo: Box<dyn ActuatorPort>,
    pub override_servo: Box<dyn ActuatorPort>,
    pub busy_led: Box<dyn IndicatorPort>,
    pub ready_led: Box<dyn IndicatorPort + Send>,
}

pub fn build(config: &ValveConfig) -> Result<Hardware, PigpioError> {
    let mut hw = match config.backend {
        Backend::Pigpio => pigpio(config)?,
        Backend::Simulated => simulated(config),
    };
    hw.busy_led.set(false);
    hw.ready_led.set(false);
    Ok(hw)
}

fn pigpio(config: &ValveConfig) -> Result<Hardware, PigpioError> {
    let client = PigpioClient::connect(&config.pigpio_hostname, config.pigpio_port)?;
    info!(
        "Using pigpio daemon at {}:{} (servo gpio{}, green gpio{}, red gpio{})",
        config.pigpio_hostname,
        config.pigpio_port,
        config.servo_bcm_pin,
        config.green_led_bcm_pin,
        config.red_led_bcm_pin
    );

    Ok(Hardware {
        sensors: Box::new(OneWireSensors::new(PigpioW1Bus::new(
            client.clone(),
            config.temp_sensor_path.clone(),
        ))),
        cycle_servo: Box::new(PigpioServo::new(client.clone(), config.servo_bcm_pin)),
        override_servo: Box::new(PigpioServo::new(client.clone(), config.servo_bcm_pin)),
        busy_led: Box::new(StatusLed::new(
            PigpioPin::new(client.clone(), config.red_led_bcm_pin),
            "red",
        )),
        ready_led: Box::new(StatusLed::new(
            PigpioPin::new(client, config.green_led_bcm_pin),
            "green",
        )),
    })
}

fn simulated(config: &ValveConfig) -> Hardware {
    info!(
        "Using simulated hardware, probes read from {}",
        config.temp_sensor_path
    );
    let servo = SimulatedServo::new();

    Hardware {
        sensors: Box::new(OneWireSensors::new(DirectoryW1Bus::new(
            config.temp_sensor_path.clone(),
        ))),
        cycle_servo: Box::new(servo.clone()),
        override_servo: Box::new(servo),
        busy_led: Box::new(StatusLed::new(SimulatedPin::new(), "red")),
        ready_led: Box::new(StatusLed::new(SimulatedPin::new(), "green")),
    }
}
