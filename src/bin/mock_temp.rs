//! mock-temp — feeds fake DS18B20 records to the simulated backend.
//!
//! Subscribes to `mock/temp` and, for each `{"id": .., "value": ..}`
//! message, writes `<dir>/28-00000<id>/w1_slave` in the kernel's record
//! format.  Point the controller's `temp_sensor_path` at the same
//! directory and run it with `--backend simulated`.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use rumqttc::{Client, Event, MqttOptions, Packet, QoS};
use serde::Deserialize;
use serde_json::Value;

use mixvalve::sensors::bus::RECORD_FILE;
use mixvalve::sensors::w1::render_record;
use mixvalve::topics;

/// Write mock 1-Wire temperature records from MQTT messages.
#[derive(Parser, Debug)]
#[command(name = "mock-temp", version, long_about = None)]
struct Options {
    #[arg(long, env = "MQTT_USERNAME")]
    mqtt_username: String,

    #[arg(long, env = "MQTT_PASSWORD", hide_env_values = true)]
    mqtt_password: String,

    #[arg(long, env = "MQTT_HOSTNAME")]
    mqtt_hostname: String,

    #[arg(long, env = "MQTT_PORT")]
    mqtt_port: u16,

    /// Directory where sensor folders are created
    #[arg(long, env = "SENSOR_DIRECTORY", default_value = "/tmp/w1/devices")]
    sensor_directory: PathBuf,

    #[arg(short, long, env = "VERBOSE")]
    verbose: bool,
}

#[derive(Debug, Deserialize)]
struct MockReading {
    id: Value,
    value: Value,
}

/// Decode a `mock/temp` payload into a folder suffix and degrees.
/// `value` may be a JSON number or a numeric string.
fn parse_mock(payload: &[u8]) -> Result<(String, f64)> {
    let reading: MockReading = serde_json::from_slice(payload).context("decoding mock reading")?;
    let id = match reading.id {
        Value::String(s) => s,
        other => other.to_string(),
    };
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        anyhow::bail!("id {:?} is not alphanumeric", id);
    }
    let celsius = match &reading.value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .with_context(|| format!("value {} is not a temperature", reading.value))?;
    Ok((id, celsius))
}

fn record_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("28-00000{id}")).join(RECORD_FILE)
}

fn write_record(dir: &Path, id: &str, celsius: f64) -> Result<PathBuf> {
    let path = record_path(dir, id);
    if let Some(folder) = path.parent() {
        fs::create_dir_all(folder).with_context(|| format!("creating {}", folder.display()))?;
    }
    fs::write(&path, render_record(celsius)).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn main() -> Result<()> {
    let opts = Options::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if opts.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    fs::create_dir_all(&opts.sensor_directory)
        .with_context(|| format!("creating {}", opts.sensor_directory.display()))?;

    let mut mqtt_opts = MqttOptions::new("mixvalve-mock-temp", opts.mqtt_hostname, opts.mqtt_port);
    mqtt_opts.set_credentials(opts.mqtt_username, opts.mqtt_password);
    mqtt_opts.set_keep_alive(Duration::from_secs(60));
    let (client, mut connection) = Client::new(mqtt_opts, 10);

    for notification in connection.iter() {
        match notification {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("Connected to the MQTT broker.");
                if let Err(e) = client.try_subscribe(topics::MOCK_TEMP, QoS::AtLeastOnce) {
                    warn!("Subscribe to [{}] failed: {}", topics::MOCK_TEMP, e);
                }
            }
            Ok(Event::Incoming(Packet::Publish(p))) => {
                match parse_mock(&p.payload)
                    .and_then(|(id, c)| write_record(&opts.sensor_directory, &id, c))
                {
                    Ok(path) => debug!("Wrote {}", path.display()),
                    Err(e) => warn!("Ignoring mock reading: {:#}", e),
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("MQTT connection error: {}", e);
                thread::sleep(Duration::from_secs(1));
            }
        }
    }
    Ok(())
}
