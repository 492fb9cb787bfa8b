//! ThermoBeacon (WS02) manufacturer-data decoding.
//!
//! The payload is the 18-byte manufacturer-specific data block, without the
//! company id. All multi-byte fields are little-endian:
//! - Bytes 0-1: unused
//! - Bytes 2-7: sensor MAC address (reversed)
//! - Bytes 8-9: battery level
//! - Bytes 10-11: temperature, 1/16 °C
//! - Bytes 12-13: humidity, 1/16 %
//! - Bytes 14-17: uptime in seconds since last reset

use crate::calibration::Calibration;
use crate::mac_address::MacAddress;
use crate::reading::SensorData;
use crate::resolver::resolve;

/// Length of a ThermoBeacon measurement payload.
pub const PAYLOAD_LEN: usize = 18;

const MAC_OFFSET: usize = 2;
const BATTERY_OFFSET: usize = 8;
const TEMPERATURE_OFFSET: usize = 10;
const HUMIDITY_OFFSET: usize = 12;
const UPTIME_OFFSET: usize = 14;

/// Scaled values above this are negative readings.
const NEGATIVE_THRESHOLD: f64 = 4000.0;
const NEGATIVE_CORRECTION: f64 = 4096.0;

/// Payload fields before identity resolution and calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReading {
    pub mac: MacAddress,
    pub battery: u16,
    pub uptime: u32,
    /// Sign-corrected temperature, not rounded
    pub temperature: f64,
    /// Sign-corrected humidity, not rounded
    pub humidity: f64,
}

/// Extract the raw fields from a payload.
pub fn decode_payload(payload: &[u8; PAYLOAD_LEN]) -> RawReading {
    RawReading {
        mac: MacAddress::from_wire(field(payload, MAC_OFFSET)),
        battery: u16::from_le_bytes(field(payload, BATTERY_OFFSET)),
        uptime: u32::from_le_bytes(field(payload, UPTIME_OFFSET)),
        temperature: sensor_value(u16::from_le_bytes(field(payload, TEMPERATURE_OFFSET))),
        humidity: sensor_value(u16::from_le_bytes(field(payload, HUMIDITY_OFFSET))),
    }
}

/// Decode a payload into a labeled, calibrated reading.
///
/// `calibration` should be a single snapshot taken for this advertisement.
/// The returned `label` is `None` when the address matches neither
/// configured sensor; such readings must not be displayed.
pub fn decode(payload: &[u8; PAYLOAD_LEN], rssi: i16, calibration: &Calibration) -> SensorData {
    let raw = decode_payload(payload);
    let resolution = resolve(&raw.mac, calibration);

    SensorData {
        mac: raw.mac,
        label: resolution.role,
        battery: raw.battery,
        rssi,
        uptime: raw.uptime,
        temperature: round_tenth(raw.temperature + resolution.temperature_offset),
        humidity: round_tenth(raw.humidity + resolution.humidity_offset),
    }
}

/// Round to one decimal place, ties away from zero.
#[inline]
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Scale a raw 1/16-unit value and apply the device's sign convention.
///
/// The threshold is compared against the already scaled value.
fn sensor_value(raw: u16) -> f64 {
    let value = f64::from(raw) / 16.0;
    if value > NEGATIVE_THRESHOLD {
        value - NEGATIVE_CORRECTION
    } else {
        value
    }
}

fn field<const N: usize>(payload: &[u8; PAYLOAD_LEN], offset: usize) -> [u8; N] {
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&payload[offset..offset + N]);
    bytes
}
