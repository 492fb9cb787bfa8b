//! Human-readable log line formatter.

use crate::output::{OutputFormatter, format_uptime};
use crate::reading::SensorData;

/// Formats readings as single log lines:
///
/// ```text
///   Inside Temp: 21.4°C - Hum: 45.0% - Bat: 100 - RSSI: -67 - Uptime: 3d 4h 12m
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct LogLineFormatter;

impl LogLineFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for LogLineFormatter {
    fn format(&self, reading: &SensorData) -> String {
        let label = reading.label.map(|role| role.to_string()).unwrap_or_default();
        format!(
            "{:>8} Temp: {:.1}°C - Hum: {:.1}% - Bat: {} - RSSI: {} - Uptime: {}",
            label,
            reading.temperature,
            reading.humidity,
            reading.battery,
            reading.rssi,
            format_uptime(reading.uptime)
        )
    }
}
