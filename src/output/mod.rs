//! Output formatters for ThermoBeacon readings.
//!
//! This module provides a trait for rendering readings and the uptime
//! breakdown shared by formatters.

pub mod log_line;

use crate::reading::SensorData;

const SECONDS_PER_DAY: u32 = 24 * 3600;
const SECONDS_PER_HOUR: u32 = 3600;
const SECONDS_PER_MINUTE: u32 = 60;

/// Trait for formatting readings into output lines.
pub trait OutputFormatter: Send + Sync {
    /// Format a resolved reading.
    ///
    /// # Arguments
    /// * `reading` - A reading whose `label` is set
    ///
    /// # Returns
    /// A single output line without a trailing newline
    fn format(&self, reading: &SensorData) -> String;
}

/// Render an uptime in seconds as `"{days}d {hours}h {minutes}m"`.
///
/// Remaining seconds are dropped, not rounded.
///
/// # Example
/// ```
/// use thermobeacon_listener::output::format_uptime;
///
/// assert_eq!(format_uptime(90_061), "1d 1h 1m");
/// ```
pub fn format_uptime(seconds: u32) -> String {
    let days = seconds / SECONDS_PER_DAY;
    let hours = (seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    format!("{days}d {hours}h {minutes}m")
}
