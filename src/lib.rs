//! `thermobeacon-listener` library.
//!
//! The binary (`src/main.rs`) is responsible for logger setup and process exit
//! codes. Decoding lives in [`crate::decoder`], identity matching in
//! [`crate::resolver`], and the filtering entry point for raw advertisements
//! in [`crate::dispatch`]. [`crate::app`] wires them to a scanner and an
//! output stream.

pub mod app;
pub mod calibration;
pub mod config;
pub mod decoder;
pub mod dispatch;
pub mod mac_address;
pub mod output;
pub mod reading;
pub mod resolver;
pub mod scanner;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types at the crate root
pub use calibration::{Calibration, CalibrationStore, SensorCalibration};
pub use config::{ConfigError, ConfigWatcher};
pub use decoder::{PAYLOAD_LEN, decode, decode_payload};
pub use dispatch::{Advertisement, BROADCAST_NAME, Rejection, dispatch};
pub use mac_address::MacAddress;
pub use output::log_line::LogLineFormatter;
pub use output::{OutputFormatter, format_uptime};
pub use reading::{Role, SensorData};
pub use resolver::{Resolution, resolve};
pub use scanner::ScanError;
