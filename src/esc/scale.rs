//! # Field Scalers
//!
//! Fixed-point conversions from raw channel fields to physical units.

/// Current code resolution: 1/64 A per count
const CURRENT_DIVISOR: f32 = 64.0;

/// Voltage code resolution: 0.1 V per count
const VOLTAGE_SCALE: f32 = 0.1;

/// Throttle code that represents 100%
const THROTTLE_FULL_SCALE: f32 = 32768.0;

/// The eRPM field is transmitted divided by ten
const ERPM_MULTIPLIER: f64 = 10.0;

/// Convert a current code (main or phase) to amperes
pub fn decode_current(raw: i16) -> f32 {
    raw as f32 / CURRENT_DIVISOR
}

/// Convert a voltage code to volts
pub fn decode_voltage(raw: u16) -> f32 {
    raw as f32 * VOLTAGE_SCALE
}

/// Convert a throttle code to a ratio (nominally 0.0 - 1.0)
pub fn decode_throttle(raw: u16) -> f32 {
    raw as f32 / THROTTLE_FULL_SCALE
}

/// Convert an electrical RPM code to mechanical RPM, rounding down
///
/// `pole_count` must be nonzero; configuration validation enforces it.
///
/// # Examples
///
/// ```
/// use esc_telemetry::esc::scale::erpm_to_rpm;
///
/// assert_eq!(erpm_to_rpm(100, 1), 1000);
/// assert_eq!(erpm_to_rpm(33, 4), 82);
/// ```
pub fn erpm_to_rpm(raw: u16, pole_count: u32) -> u32 {
    (raw as f64 * ERPM_MULTIPLIER / pole_count as f64).floor() as u32
}
