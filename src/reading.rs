//! Decoded ThermoBeacon reading.

use crate::mac_address::MacAddress;
use std::fmt;

/// Logical placement of a configured sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Inside,
    Outside,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` so width/alignment flags such as `{:>8}` apply.
        f.pad(match self {
            Role::Inside => "Inside",
            Role::Outside => "Outside",
        })
    }
}

/// A single reading from a ThermoBeacon sensor.
///
/// Values are final: calibration offsets have been added and temperature and
/// humidity are rounded to one decimal place.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorData {
    /// Hardware address of the sensor, in display order
    pub mac: MacAddress,
    /// Configured role, `None` when the address matches no configured sensor
    pub label: Option<Role>,
    /// Raw battery level as reported by the device
    pub battery: u16,
    /// Received signal strength in dBm, supplied by the scanner
    pub rssi: i16,
    /// Seconds since the device was last reset
    pub uptime: u32,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
}
