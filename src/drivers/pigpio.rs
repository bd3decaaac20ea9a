//! pigpio daemon socket client.
//!
//! The daemon speaks a fixed-size binary protocol over TCP (default port
//! 8888).  Every request is four little-endian `u32`s followed by an
//! optional extension payload whose length travels in `p3`:
//!
//! ```text
//!  ┌────────┬────────┬────────┬────────┬──────────────────┐
//!  │  cmd   │   p1   │   p2   │   p3   │ ext (p3 bytes)   │
//!  └────────┴────────┴────────┴────────┴──────────────────┘
//! ```
//!
//! The reply echoes the header with the last word replaced by a signed
//! result; negative results are daemon error codes.  File reads and
//! listings follow the header with `result` bytes of data.
//!
//! A [`PigpioClient`] is a cheap clone over one shared connection.  The
//! mutex is held for a whole request/response exchange so the cycle task
//! and the override path can both drive pins.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::{Arc, Mutex};

use log::debug;

/// Command codes used by this crate.
pub mod cmd {
    pub const WRITE: u32 = 4;
    pub const SERVO: u32 = 8;
    pub const FILE_OPEN: u32 = 83;
    pub const FILE_CLOSE: u32 = 84;
    pub const FILE_READ: u32 = 85;
    pub const FILE_LIST: u32 = 88;
}

/// `file_open` mode flag for reading.
pub const FILE_MODE_READ: u32 = 1;

/// `file_list` status when no file matches the pattern.
pub const PI_NO_FILE_MATCH: i32 = -128;

/// Upper bound the daemon honours for a single listing.
const FILE_LIST_MAX: u32 = 60_000;

const HEADER_LEN: usize = 16;

#[derive(Debug)]
pub enum PigpioError {
    /// Socket failure; the connection should be considered lost.
    Io(std::io::Error),
    /// Negative status code from the daemon.
    Daemon(i32),
    /// Another user of the connection panicked mid-exchange.
    Poisoned,
}

impl core::fmt::Display for PigpioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Daemon(code) => write!(f, "daemon error {code}"),
            Self::Poisoned => write!(f, "connection lock poisoned"),
        }
    }
}

impl std::error::Error for PigpioError {}

impl embedded_hal::digital::Error for PigpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl From<std::io::Error> for PigpioError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ── Wire codec ───────────────────────────────────────────────

/// Encode one request frame.
pub fn encode_request(cmd: u32, p1: u32, p2: u32, ext: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(HEADER_LEN + ext.len());
    frame.extend_from_slice(&cmd.to_le_bytes());
    frame.extend_from_slice(&p1.to_le_bytes());
    frame.extend_from_slice(&p2.to_le_bytes());
    frame.extend_from_slice(&(ext.len() as u32).to_le_bytes());
    frame.extend_from_slice(ext);
    frame
}

/// Extract the signed result from a reply header.
pub fn decode_result(reply: &[u8; HEADER_LEN]) -> i32 {
    i32::from_le_bytes([reply[12], reply[13], reply[14], reply[15]])
}

// ── Client ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct PigpioClient {
    conn: Arc<Mutex<TcpStream>>,
}

impl PigpioClient {
    /// Connect to the daemon.  Failure here is fatal for the hardware backend.
    pub fn connect(host: &str, port: u16) -> Result<Self, PigpioError> {
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true)?;
        debug!("pigpio: connected to {}:{}", host, port);
        Ok(Self::from_stream(stream))
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        Self {
            conn: Arc::new(Mutex::new(stream)),
        }
    }

    /// One request/response exchange.  Returns the non-negative result
    /// and, when `with_data` is set, the `result` bytes that follow it.
    fn exchange(
        &self,
        cmd: u32,
        p1: u32,
        p2: u32,
        ext: &[u8],
        with_data: bool,
    ) -> Result<(i32, Vec<u8>), PigpioError> {
        let mut stream = self.conn.lock().map_err(|_| PigpioError::Poisoned)?;
        stream.write_all(&encode_request(cmd, p1, p2, ext))?;

        let mut reply = [0u8; HEADER_LEN];
        stream.read_exact(&mut reply)?;
        let result = decode_result(&reply);
        if result < 0 {
            return Err(PigpioError::Daemon(result));
        }

        let mut data = Vec::new();
        if with_data && result > 0 {
            data.resize(result as usize, 0);
            stream.read_exact(&mut data)?;
        }
        Ok((result, data))
    }

    /// Set a GPIO output level.
    pub fn write(&self, gpio: u32, high: bool) -> Result<(), PigpioError> {
        self.exchange(cmd::WRITE, gpio, u32::from(high), &[], false)
            .map(|_| ())
    }

    /// Start (or with 0, stop) servo pulses on `gpio`.
    pub fn set_servo_pulsewidth(&self, gpio: u32, pulse_width: u32) -> Result<(), PigpioError> {
        self.exchange(cmd::SERVO, gpio, pulse_width, &[], false)
            .map(|_| ())
    }

    /// Newline-separated list of files matching a glob pattern.
    pub fn file_list(&self, pattern: &str) -> Result<Vec<u8>, PigpioError> {
        self.exchange(cmd::FILE_LIST, FILE_LIST_MAX, 0, pattern.as_bytes(), true)
            .map(|(_, data)| data)
    }

    pub fn file_open(&self, path: &str, mode: u32) -> Result<u32, PigpioError> {
        self.exchange(cmd::FILE_OPEN, mode, 0, path.as_bytes(), false)
            .map(|(handle, _)| handle as u32)
    }

    pub fn file_read(&self, handle: u32, count: u32) -> Result<Vec<u8>, PigpioError> {
        self.exchange(cmd::FILE_READ, handle, count, &[], true)
            .map(|(_, data)| data)
    }

    pub fn file_close(&self, handle: u32) -> Result<(), PigpioError> {
        self.exchange(cmd::FILE_CLOSE, handle, 0, &[], false)
            .map(|_| ())
    }
}
