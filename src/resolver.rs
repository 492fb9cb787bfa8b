//! Sensor identity resolution against the configured calibration.

use crate::calibration::Calibration;
use crate::mac_address::MacAddress;
use crate::reading::Role;

/// Outcome of matching a decoded address against the configured sensors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Matching role, `None` for an unrecognized sensor
    pub role: Option<Role>,
    pub temperature_offset: f64,
    pub humidity_offset: f64,
}

impl Resolution {
    const UNRESOLVED: Resolution = Resolution {
        role: None,
        temperature_offset: 0.0,
        humidity_offset: 0.0,
    };
}

/// Resolve `mac` to a configured role and its calibration offsets.
///
/// The canonical uppercase rendering of `mac` is compared exactly against the
/// configured address strings. Inside is checked before Outside, so it wins
/// when both roles are configured with the same address.
pub fn resolve(mac: &MacAddress, calibration: &Calibration) -> Resolution {
    let address = mac.to_string();

    [Role::Inside, Role::Outside]
        .into_iter()
        .find(|role| calibration.get(*role).address == address)
        .map(|role| {
            let entry = calibration.get(role);
            Resolution {
                role: Some(role),
                temperature_offset: entry.temperature_offset,
                humidity_offset: entry.humidity_offset,
            }
        })
        .unwrap_or(Resolution::UNRESOLVED)
}
