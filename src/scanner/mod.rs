//! BLE scanner boundary.
//!
//! Backends deliver raw [`Advertisement`]s; filtering and decoding happen in
//! [`crate::dispatch`].

#[cfg(feature = "bluer")]
pub mod bluer;

use crate::dispatch::Advertisement;
use thiserror::Error;
use tokio::sync::mpsc;

/// Error type for scanner operations.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Bluetooth/adapter related error
    #[error("Bluetooth error: {0}")]
    Bluetooth(String),
    /// Backend not available (not compiled in)
    #[error("Backend '{0}' not available (not compiled in)")]
    BackendNotAvailable(String),
}

/// Bluetooth complete local name (AD type 0x09)
#[cfg(feature = "bluer")]
pub const COMPLETE_LOCAL_NAME_TYPE: u8 = 0x09;

/// Channel buffer size for advertisements.
pub const ADVERTISEMENT_CHANNEL_BUFFER_SIZE: usize = 100;

/// Start scanning for ThermoBeacon advertisements with the compiled-in backend.
///
/// Runs until the adapter goes away. Each received advertisement is sent
/// through the returned channel unfiltered beyond what the backend can match
/// in the controller.
pub async fn start_scan() -> Result<mpsc::Receiver<Advertisement>, ScanError> {
    #[cfg(feature = "bluer")]
    return bluer::start_scan().await;

    #[cfg(not(feature = "bluer"))]
    Err(ScanError::BackendNotAvailable("bluer".to_string()))
}
