//! Message bus topics and payload formats.

/// Override: servo pulse width (integer, quantized on receipt).
pub const SERVO: &str = "home/servo";
/// Override: middle reference temperature.
pub const MIDDLE_TEMP: &str = "home/4way_valve/middle_temp";
/// Override: bottom reference temperature.
pub const BOTTOM_TEMP: &str = "home/4way_valve/bottom_temp";
/// Published mix ratio, as a percentage.
pub const OPEN_VALVE: &str = "dash/open_valve";
/// Input of the mock temperature feeder.
pub const MOCK_TEMP: &str = "mock/temp";

/// Topics the controller subscribes to.
pub const SUBSCRIPTIONS: [&str; 3] = [SERVO, MIDDLE_TEMP, BOTTOM_TEMP];

/// Per-probe temperature topic.
pub fn temperature(index: usize) -> String {
    format!("dash/temperature/{index}")
}

pub fn temperature_payload(celsius: f64) -> String {
    format!("{celsius:4.1}°")
}

pub fn open_valve_payload(percent: f64) -> String {
    format!("{percent:4.1}%")
}
