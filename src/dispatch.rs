//! Advertisement filtering and dispatch to the decoder.
//!
//! [`dispatch`] is the only path into [`crate::decoder::decode`]: it checks the
//! broadcast name and payload length before any offset arithmetic happens.

use crate::calibration::Calibration;
use crate::decoder::{PAYLOAD_LEN, decode};
use crate::mac_address::MacAddress;
use crate::reading::SensorData;
use std::collections::BTreeMap;
use thiserror::Error;

/// Local name broadcast by ThermoBeacon sensors.
pub const BROADCAST_NAME: &str = "ThermoBeacon";

/// A raw advertisement as delivered by a scanner backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Advertisement {
    /// Address of the advertising device
    pub address: MacAddress,
    /// Advertised local name, if any
    pub local_name: Option<String>,
    /// Manufacturer-specific data keyed by company id, without the id prefix
    pub manufacturer_data: BTreeMap<u16, Vec<u8>>,
    /// Received signal strength in dBm
    pub rssi: i16,
}

impl Advertisement {
    /// Manufacturer data of the lowest company id.
    pub fn payload(&self) -> Option<&[u8]> {
        self.manufacturer_data.values().next().map(Vec::as_slice)
    }
}

/// Reasons an advertisement does not produce a displayable reading.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("not a ThermoBeacon advertisement (name: {0:?})")]
    BroadcastName(Option<String>),
    #[error("no manufacturer data")]
    NoManufacturerData,
    #[error("unexpected payload length {0} (expected 18)")]
    PayloadLength(usize),
    #[error("unknown sensor {0}")]
    UnknownSensor(MacAddress),
}

/// Filter and decode one advertisement.
///
/// Returns a reading only for ThermoBeacon advertisements with an 18-byte
/// payload whose address matches a configured sensor.
pub fn dispatch(
    advertisement: &Advertisement,
    calibration: &Calibration,
) -> Result<SensorData, Rejection> {
    if advertisement.local_name.as_deref() != Some(BROADCAST_NAME) {
        return Err(Rejection::BroadcastName(advertisement.local_name.clone()));
    }

    let payload = advertisement
        .payload()
        .ok_or(Rejection::NoManufacturerData)?;
    let payload: &[u8; PAYLOAD_LEN] = payload
        .try_into()
        .map_err(|_| Rejection::PayloadLength(payload.len()))?;

    let reading = decode(payload, advertisement.rssi, calibration);
    match reading.label {
        Some(_) => Ok(reading),
        None => Err(Rejection::UnknownSensor(reading.mac)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Role;
    use crate::test_utils::{advertisement, calibration, inside_wire_mac, outside_wire_mac, payload};

    #[test]
    fn test_dispatch_inside_reading() {
        let adv = advertisement(payload(inside_wire_mac(), 100, 256, 800, 3600).to_vec());
        let cal = calibration((1.0, -2.0), (0.0, 0.0));

        let reading = dispatch(&adv, &cal).unwrap();

        assert_eq!(reading.label, Some(Role::Inside));
        assert_eq!(reading.temperature, 17.0);
        assert_eq!(reading.humidity, 48.0);
        assert_eq!(reading.rssi, adv.rssi);
    }

    #[test]
    fn test_dispatch_outside_reading() {
        let adv = advertisement(payload(outside_wire_mac(), 100, 256, 800, 3600).to_vec());
        let cal = calibration((1.0, -2.0), (0.5, 0.5));

        let reading = dispatch(&adv, &cal).unwrap();

        assert_eq!(reading.label, Some(Role::Outside));
        assert_eq!(reading.temperature, 16.5);
    }

    #[test]
    fn test_dispatch_rejects_other_names() {
        let cal = calibration((0.0, 0.0), (0.0, 0.0));
        let mut adv = advertisement(payload(inside_wire_mac(), 0, 0, 0, 0).to_vec());

        adv.local_name = Some("ThermoBeacon2".to_string());
        assert_eq!(
            dispatch(&adv, &cal),
            Err(Rejection::BroadcastName(Some("ThermoBeacon2".to_string())))
        );

        adv.local_name = None;
        assert_eq!(dispatch(&adv, &cal), Err(Rejection::BroadcastName(None)));
    }

    #[test]
    fn test_dispatch_rejects_wrong_length() {
        let cal = calibration((0.0, 0.0), (0.0, 0.0));
        let mut data = payload(inside_wire_mac(), 0, 0, 0, 0).to_vec();

        data.push(0);
        assert_eq!(
            dispatch(&advertisement(data.clone()), &cal),
            Err(Rejection::PayloadLength(19))
        );

        data.truncate(17);
        assert_eq!(
            dispatch(&advertisement(data), &cal),
            Err(Rejection::PayloadLength(17))
        );

        assert_eq!(
            dispatch(&advertisement(Vec::new()), &cal),
            Err(Rejection::PayloadLength(0))
        );
    }

    #[test]
    fn test_dispatch_rejects_missing_manufacturer_data() {
        let cal = calibration((0.0, 0.0), (0.0, 0.0));
        let mut adv = advertisement(Vec::new());
        adv.manufacturer_data.clear();

        assert_eq!(dispatch(&adv, &cal), Err(Rejection::NoManufacturerData));
    }

    #[test]
    fn test_dispatch_rejects_unknown_sensor() {
        let cal = calibration((0.0, 0.0), (0.0, 0.0));
        let adv = advertisement(payload([1, 2, 3, 4, 5, 6], 0, 0, 0, 0).to_vec());

        assert_eq!(
            dispatch(&adv, &cal),
            Err(Rejection::UnknownSensor(MacAddress([6, 5, 4, 3, 2, 1])))
        );
    }

    #[test]
    fn test_dispatch_uses_lowest_company_id() {
        let cal = calibration((0.0, 0.0), (0.0, 0.0));
        let mut adv = advertisement(payload(inside_wire_mac(), 0, 0, 0, 0).to_vec());
        adv.manufacturer_data.insert(0xFFFF, vec![0; 24]);

        assert!(dispatch(&adv, &cal).is_ok());
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(
            Rejection::PayloadLength(20).to_string(),
            "unexpected payload length 20 (expected 18)"
        );
        assert_eq!(
            Rejection::UnknownSensor(MacAddress([0; 6])).to_string(),
            "unknown sensor 00:00:00:00:00:00"
        );
    }
}
