//! DS18B20 record parsing and the per-cycle sensor reader.
//!
//! The kernel's `w1_slave` file has two lines:
//!
//! ```text
//! 73 01 4b 46 7f ff 0d 10 41 : crc=41 YES
//! 73 01 4b 46 7f ff 0d 10 41 t=23187
//! ```
//!
//! `YES` marks a valid conversion; `t=` carries signed millidegrees.
//! A `NO` on the CRC line means the probe has not finished converting.

use log::{debug, warn};

use crate::app::ports::SensorPort;
use crate::error::SensorError;

use super::{Reading, SensorBus, PLACEHOLDER_READINGS};

/// Reading used for a probe that is present but not ready.
pub const NOT_READY_FALLBACK: Reading = Reading::new(0.0);

/// Parse one record into degrees.
pub fn parse_record(data: &str) -> Result<f64, SensorError> {
    if !data.contains("crc=") {
        return Err(SensorError::Malformed);
    }
    if !data.contains("YES") {
        return Err(SensorError::NotReady);
    }
    let (_, reading) = data.split_once(" t=").ok_or(SensorError::Malformed)?;
    let milli: i64 = reading
        .trim()
        .parse()
        .map_err(|_| SensorError::Malformed)?;
    Ok(milli as f64 / 1000.0)
}

/// Render a record in the kernel's format.  Resolution is 10 m°C.
pub fn render_record(celsius: f64) -> String {
    let centi = (celsius * 100.0) as i64;
    format!(
        "70 01 4b 46 7f ff 10 10 e1 : crc=e1 YES\n70 01 4b 46 7f ff 10 10 e1 t={}0",
        centi
    )
}

/// [`SensorPort`] over any [`SensorBus`].
pub struct OneWireSensors<B: SensorBus> {
    bus: B,
}

impl<B: SensorBus> OneWireSensors<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }
}

impl<B: SensorBus> SensorPort for OneWireSensors<B> {
    /// Re-enumerate and read every probe.
    ///
    /// Not-ready probes contribute [`NOT_READY_FALLBACK`]; malformed or
    /// unreadable ones are dropped.  If enumeration fails the fixed
    /// [`PLACEHOLDER_READINGS`] are returned instead.
    fn read_all(&mut self) -> Vec<Reading> {
        let ids = match self.bus.list_sensors() {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Sensor enumeration failed ({}), using placeholder readings", e);
                return PLACEHOLDER_READINGS.to_vec();
            }
        };

        let mut readings = Vec::with_capacity(ids.len());
        for id in &ids {
            let record = match self.bus.read_record(id) {
                Ok(r) => r,
                Err(e) => {
                    warn!("Sensor {}: {}, skipped", id, e);
                    continue;
                }
            };
            match parse_record(&record) {
                Ok(celsius) => readings.push(Reading::new(celsius)),
                Err(SensorError::NotReady) => {
                    debug!("Sensor {}: not ready, reporting fallback", id);
                    readings.push(NOT_READY_FALLBACK);
                }
                Err(e) => warn!("Sensor {}: {}, skipped", id, e),
            }
        }
        readings
    }
}
