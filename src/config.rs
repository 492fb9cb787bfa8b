//! Sensor configuration file loading and hot reload.
//!
//! The configuration is a JSON document naming the two sensors:
//!
//! ```json
//! {
//!   "inside":  { "mac": "AA:BB:CC:DD:EE:FF", "temperature-calibration": -0.4, "humidity-calibration": 2.0 },
//!   "outside": { "mac": "11:22:33:44:55:66", "temperature-calibration": 0.0, "humidity-calibration": 0.0 }
//! }
//! ```

use crate::calibration::{Calibration, CalibrationStore};
use crate::reading::Role;
use log::{error, info};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tokio::task::JoinHandle;

/// Required length of a configured address, `XX:XX:XX:XX:XX:XX`.
pub const ADDRESS_LEN: usize = 17;

/// Errors raised while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid MAC address for {role} sensor: '{address}' (must be 17 characters long)")]
    InvalidAddress { role: Role, address: String },
}

/// Parse and validate configuration contents.
pub fn parse(contents: &str) -> Result<Calibration, ConfigError> {
    let calibration: Calibration = serde_json::from_str(contents)?;
    validate(&calibration)?;
    Ok(calibration)
}

/// Check that both configured addresses have the canonical length.
pub fn validate(calibration: &Calibration) -> Result<(), ConfigError> {
    for role in [Role::Inside, Role::Outside] {
        let address = &calibration.get(role).address;
        if address.len() != ADDRESS_LEN {
            return Err(ConfigError::InvalidAddress {
                role,
                address: address.clone(),
            });
        }
    }
    Ok(())
}

/// Load the configuration file at `path`.
pub fn load(path: &Path) -> Result<Calibration, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let calibration = parse(&contents)?;
    log_calibration(&calibration);
    Ok(calibration)
}

fn log_calibration(calibration: &Calibration) {
    let inside = &calibration.inside;
    let outside = &calibration.outside;
    info!(
        "Inside sensor:  MAC {} - Temp cal = {:.2} - Humidity cal = {:.2}",
        inside.address, inside.temperature_offset, inside.humidity_offset
    );
    info!(
        "Outside sensor: MAC {} - Temp cal = {:.2} - Humidity cal = {:.2}",
        outside.address, outside.temperature_offset, outside.humidity_offset
    );
}

/// Reloads the configuration into a [`CalibrationStore`] when the file changes.
///
/// Changes are detected by modification time. A reload that fails leaves the
/// previous calibration active.
#[derive(Debug)]
pub struct ConfigWatcher {
    path: PathBuf,
    store: CalibrationStore,
    last_modified: Option<SystemTime>,
}

impl ConfigWatcher {
    /// Create a watcher for `path`, treating its current contents as already loaded.
    pub async fn new(path: impl Into<PathBuf>, store: CalibrationStore) -> Self {
        let path = path.into();
        let last_modified = modified(&path).await.ok();
        Self {
            path,
            store,
            last_modified,
        }
    }

    /// Reload the configuration if the file changed since the last check.
    ///
    /// Returns `Ok(true)` when a new calibration was swapped into the store.
    pub async fn check(&mut self) -> Result<bool, ConfigError> {
        let modified = modified(&self.path)
            .await
            .map_err(|source| ConfigError::Io {
                path: self.path.clone(),
                source,
            })?;
        if self.last_modified == Some(modified) {
            return Ok(false);
        }
        self.last_modified = Some(modified);

        info!("Config file changed: {}", self.path.display());
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ConfigError::Io {
                path: self.path.clone(),
                source,
            })?;
        let calibration = parse(&contents)?;
        log_calibration(&calibration);
        self.store.replace(calibration);
        Ok(true)
    }

    /// Poll for changes every `interval` on a background task.
    pub fn spawn(mut self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.check().await {
                    error!("Config reload failed, keeping previous calibration: {}", e);
                }
            }
        })
    }
}

async fn modified(path: &Path) -> io::Result<SystemTime> {
    tokio::fs::metadata(path).await?.modified()
}

/// Parse a duration from a human-readable string.
///
/// Supports the following suffixes:
/// - `s` or no suffix: seconds
/// - `m`: minutes
/// - `h`: hours
/// - `ms`: milliseconds
///
/// # Examples
/// ```
/// use thermobeacon_listener::config::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
/// assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
/// ```
pub fn parse_duration(src: &str) -> Result<Duration, String> {
    let src = src.trim();
    if src.is_empty() {
        return Err("empty duration string".to_string());
    }

    let parse = |num: &str| {
        num.trim()
            .parse::<u64>()
            .map_err(|_| format!("invalid duration: {}", src))
    };

    if let Some(num) = src.strip_suffix("ms") {
        return parse(num).map(Duration::from_millis);
    }
    if let Some(num) = src.strip_suffix('h') {
        return parse(num).map(|hours| Duration::from_secs(hours * 3600));
    }
    if let Some(num) = src.strip_suffix('m') {
        return parse(num).map(|minutes| Duration::from_secs(minutes * 60));
    }
    if let Some(num) = src.strip_suffix('s') {
        return parse(num).map(Duration::from_secs);
    }

    // No suffix, treat as seconds
    parse(src).map(Duration::from_secs)
}
