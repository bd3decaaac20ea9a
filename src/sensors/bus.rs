//! Concrete [`SensorBus`] implementations.
//!
//! Both buses look for DS18B20 family folders (`28-00*`) holding a
//! `w1_slave` file and enumerate them in lexicographic order.  That order
//! decides which probe is index 0; it follows the device ids, not the
//! physical position of the probes.

use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

use crate::drivers::pigpio::{FILE_MODE_READ, PI_NO_FILE_MATCH, PigpioClient, PigpioError};
use crate::error::SensorError;

use super::SensorBus;

/// Family-code prefix of the temperature probes.
pub const PROBE_PREFIX: &str = "28-00";
/// Record file inside each probe folder.
pub const RECORD_FILE: &str = "w1_slave";

/// The kernel record is well under this size.
const RECORD_READ_LEN: u32 = 1000;

// ── Remote: pigpio file API ──────────────────────────────────

/// Reads probes on the daemon's host through its file API.
pub struct PigpioW1Bus {
    client: PigpioClient,
    root: String,
}

impl PigpioW1Bus {
    pub fn new(client: PigpioClient, root: impl Into<String>) -> Self {
        Self {
            client,
            root: root.into(),
        }
    }

    fn pattern(&self) -> String {
        format!("{}/{}*/{}", self.root, PROBE_PREFIX, RECORD_FILE)
    }
}

impl SensorBus for PigpioW1Bus {
    fn list_sensors(&mut self) -> Result<Vec<String>, SensorError> {
        let pattern = self.pattern();
        let raw = self.client.file_list(&pattern).map_err(|e| {
            warn!(
                "pigpio: listing {} failed ({}), readings are placeholders",
                pattern,
                list_failure(&e)
            );
            SensorError::Unavailable
        })?;
        let listing = String::from_utf8_lossy(&raw);
        let mut ids: Vec<String> = listing
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn read_record(&mut self, id: &str) -> Result<String, SensorError> {
        let handle = self
            .client
            .file_open(id, FILE_MODE_READ)
            .map_err(|e| read_failed(id, &e))?;
        let data = self.client.file_read(handle, RECORD_READ_LEN);
        if let Err(e) = self.client.file_close(handle) {
            debug!("pigpio: closing {} failed: {}", id, e);
        }
        let data = data.map_err(|e| read_failed(id, &e))?;
        String::from_utf8(data).map_err(|_| SensorError::Malformed)
    }
}

/// Operator-facing cause of a failed sensor listing.
fn list_failure(e: &PigpioError) -> String {
    match e {
        PigpioError::Daemon(PI_NO_FILE_MATCH) => {
            format!("no sensors present, daemon code {PI_NO_FILE_MATCH}")
        }
        PigpioError::Daemon(code) => format!("daemon code {code}"),
        other => format!("connection: {other}"),
    }
}

fn read_failed(id: &str, e: &PigpioError) -> SensorError {
    debug!("pigpio: reading {} failed: {}", id, e);
    SensorError::ReadFailed
}

// ── Local: sysfs-style directory ─────────────────────────────

/// Reads probes from a local directory laid out like `/sys/bus/w1/devices`.
pub struct DirectoryW1Bus {
    root: PathBuf,
}

impl DirectoryW1Bus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SensorBus for DirectoryW1Bus {
    fn list_sensors(&mut self) -> Result<Vec<String>, SensorError> {
        let entries = fs::read_dir(&self.root).map_err(|_| SensorError::Unavailable)?;
        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(PROBE_PREFIX))
            .map(|entry| entry.path().join(RECORD_FILE))
            .filter(|path| path.is_file())
            .map(|path| path.to_string_lossy().into_owned())
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn read_record(&mut self, id: &str) -> Result<String, SensorError> {
        fs::read_to_string(id).map_err(|_| SensorError::ReadFailed)
    }
}
