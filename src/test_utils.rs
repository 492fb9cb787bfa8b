use crate::calibration::{Calibration, SensorCalibration};
use crate::decoder::PAYLOAD_LEN;
use crate::dispatch::{Advertisement, BROADCAST_NAME};
use crate::mac_address::MacAddress;
use std::collections::BTreeMap;

/// A stable MAC address for unit tests.
pub const TEST_MAC: MacAddress = MacAddress([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

pub const INSIDE_ADDRESS: &str = "AA:BB:CC:DD:EE:FF";
pub const OUTSIDE_ADDRESS: &str = "11:22:33:44:55:66";

/// Wire-order bytes of [`INSIDE_ADDRESS`].
pub fn inside_wire_mac() -> [u8; 6] {
    [0xFF, 0xEE, 0xDD, 0xCC, 0xBB, 0xAA]
}

/// Wire-order bytes of [`OUTSIDE_ADDRESS`].
pub fn outside_wire_mac() -> [u8; 6] {
    [0x66, 0x55, 0x44, 0x33, 0x22, 0x11]
}

/// Calibration for the two test addresses, offsets given as `(temperature, humidity)`.
pub fn calibration(inside: (f64, f64), outside: (f64, f64)) -> Calibration {
    Calibration {
        inside: SensorCalibration::new(INSIDE_ADDRESS, inside.0, inside.1),
        outside: SensorCalibration::new(OUTSIDE_ADDRESS, outside.0, outside.1),
    }
}

/// Build a ThermoBeacon payload from raw field values.
pub fn payload(
    wire_mac: [u8; 6],
    battery: u16,
    temperature: u16,
    humidity: u16,
    uptime: u32,
) -> [u8; PAYLOAD_LEN] {
    let mut data = [0u8; PAYLOAD_LEN];
    data[2..8].copy_from_slice(&wire_mac);
    data[8..10].copy_from_slice(&battery.to_le_bytes());
    data[10..12].copy_from_slice(&temperature.to_le_bytes());
    data[12..14].copy_from_slice(&humidity.to_le_bytes());
    data[14..18].copy_from_slice(&uptime.to_le_bytes());
    data
}

/// A ThermoBeacon advertisement carrying `data` as its only manufacturer data.
pub fn advertisement(data: Vec<u8>) -> Advertisement {
    Advertisement {
        address: TEST_MAC,
        local_name: Some(BROADCAST_NAME.to_string()),
        manufacturer_data: BTreeMap::from([(0x0010, data)]),
        rssi: -65,
    }
}
