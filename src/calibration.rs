//! Per-sensor calibration and the shared calibration snapshot.
//!
//! A [`Calibration`] holds both configured sensors. It is never edited in
//! place: a reload builds a new value and [`CalibrationStore::replace`] swaps
//! the whole snapshot, so readers always see an address paired with the
//! offsets that were loaded together with it.

use crate::reading::Role;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::watch;

/// Identity and additive offsets for one configured sensor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorCalibration {
    /// Address in canonical `XX:XX:XX:XX:XX:XX` form
    #[serde(rename = "mac")]
    pub address: String,
    /// Added to the decoded temperature (Celsius)
    #[serde(rename = "temperature-calibration", default)]
    pub temperature_offset: f64,
    /// Added to the decoded humidity (percent)
    #[serde(rename = "humidity-calibration", default)]
    pub humidity_offset: f64,
}

impl SensorCalibration {
    pub fn new(address: impl Into<String>, temperature_offset: f64, humidity_offset: f64) -> Self {
        Self {
            address: address.into(),
            temperature_offset,
            humidity_offset,
        }
    }
}

/// Calibration for both sensor roles.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Calibration {
    pub inside: SensorCalibration,
    pub outside: SensorCalibration,
}

impl Calibration {
    /// Calibration entry for `role`.
    pub fn get(&self, role: Role) -> &SensorCalibration {
        match role {
            Role::Inside => &self.inside,
            Role::Outside => &self.outside,
        }
    }
}

/// Holder of the active calibration snapshot.
///
/// Cloning the store yields another handle to the same snapshot.
#[derive(Debug, Clone)]
pub struct CalibrationStore {
    tx: Arc<watch::Sender<Arc<Calibration>>>,
}

impl CalibrationStore {
    pub fn new(initial: Calibration) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx: Arc::new(tx) }
    }

    /// The calibration active right now.
    ///
    /// Take one snapshot per advertisement and use it for the whole decode.
    pub fn snapshot(&self) -> Arc<Calibration> {
        self.tx.borrow().clone()
    }

    /// Atomically replace the active calibration.
    pub fn replace(&self, next: Calibration) {
        self.tx.send_replace(Arc::new(next));
    }

    /// Subscribe to calibration changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Calibration>> {
        self.tx.subscribe()
    }
}
