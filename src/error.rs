//! Unified error types for the valve controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! cycle boundary and the override dispatcher uniform.  All variants are
//! `Copy` so they can be logged and returned from the cycle report without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// No sensor reading was available to act as the control input.
    InsufficientInput,
    /// The reference temperatures are equal, the mix ratio is undefined.
    DegenerateRange { middle: f64, bottom: f64 },
    /// An inbound override carried a payload that could not be parsed.
    PayloadParse(PayloadError),
    /// A sensor or the sensor bus failed.
    Sensor(SensorError),
    /// The servo backend rejected or failed a command.
    Actuator(ActuatorError),
    /// The message bus failed.
    Comms(CommsError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientInput => write!(f, "no sensor readings available"),
            Self::DegenerateRange { middle, bottom } => write!(
                f,
                "degenerate reference range (middle={middle}, bottom={bottom})"
            ),
            Self::PayloadParse(e) => write!(f, "payload: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Payload errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// Payload bytes are not UTF-8.
    NotUtf8,
    /// Expected a non-negative integer.
    NotInteger,
    /// Expected a decimal number.
    NotNumber,
    /// Parsed, but NaN or infinite.
    NonFinite,
    /// Topic or payload does not fit the inbound buffer.
    TooLong,
    /// Servo pulse width the daemon would refuse.
    OutOfRange,
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotUtf8 => write!(f, "not UTF-8"),
            Self::NotInteger => write!(f, "not a non-negative integer"),
            Self::NotNumber => write!(f, "not a number"),
            Self::NonFinite => write!(f, "not a finite number"),
            Self::TooLong => write!(f, "too long"),
            Self::OutOfRange => write!(f, "servo pulse width out of range"),
        }
    }
}

impl From<PayloadError> for Error {
    fn from(e: PayloadError) -> Self {
        Self::PayloadParse(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Sensor enumeration is not possible at all (no bus, no directory).
    Unavailable,
    /// A single sensor record could not be read.
    ReadFailed,
    /// CRC check reported `NO`; the conversion is not ready yet.
    NotReady,
    /// The record does not have the expected shape.
    Malformed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "sensor bus unavailable"),
            Self::ReadFailed => write!(f, "sensor read failed"),
            Self::NotReady => write!(f, "sensor not ready"),
            Self::Malformed => write!(f, "malformed sensor record"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// The connection to the GPIO daemon is gone.
    Disconnected,
    /// The daemon answered with a negative status code.
    Rejected(i32),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "GPIO daemon disconnected"),
            Self::Rejected(code) => write!(f, "GPIO daemon rejected command ({code})"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The gateway has not drained earlier messages yet.
    InboundQueueFull,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InboundQueueFull => write!(f, "inbound queue full"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
