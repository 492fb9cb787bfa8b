//! Core application runner for `thermobeacon-listener`.
//!
//! This module is decoupled from logger setup and process exit codes so it can
//! be tested deterministically with an injected scanner and output stream.

use crate::calibration::CalibrationStore;
use crate::config::{self, ConfigError, ConfigWatcher};
use crate::dispatch::{Advertisement, dispatch};
use crate::output::OutputFormatter;
use crate::output::log_line::LogLineFormatter;
use crate::scanner::ScanError;
use clap::Parser;
use log::debug;
use std::future::Future;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Configuration for the core run loop.
#[derive(Parser, Debug, Clone)]
#[command(author, about, version)]
pub struct Options {
    /// Path to the JSON sensor configuration file.
    #[arg(long, default_value = "config.json", value_name = "PATH")]
    pub config: PathBuf,

    /// How often to check the configuration file for changes.
    /// Accepts duration with suffix: 3s, 1m, 500ms, 2h.
    /// Without suffix, value is interpreted as seconds.
    #[arg(long, default_value = "2s", value_parser = crate::config::parse_duration)]
    pub reload_interval: Duration,

    /// Verbose output, log ignored advertisements
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Errors returned by the core run loop.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Future returned by [`Scanner::start_scan`].
pub type ScanFuture<'a> =
    Pin<Box<dyn Future<Output = Result<mpsc::Receiver<Advertisement>, ScanError>> + Send + 'a>>;

/// Scanner abstraction to enable deterministic unit tests without Bluetooth hardware.
pub trait Scanner: Send + Sync {
    fn start_scan(&self) -> ScanFuture<'_>;
}

/// Real scanner implementation that delegates to the compiled-in backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealScanner;

impl Scanner for RealScanner {
    fn start_scan(&self) -> ScanFuture<'_> {
        Box::pin(crate::scanner::start_scan())
    }
}

/// Load the configuration, keep it reloaded, and process advertisements until
/// the scanner stops.
///
/// A configuration that cannot be loaded at startup is returned as an error
/// before scanning begins.
pub async fn run_with_io(
    options: Options,
    scanner: &dyn Scanner,
    out: &mut dyn Write,
) -> Result<(), RunError> {
    let store = CalibrationStore::new(config::load(&options.config)?);
    let watcher = ConfigWatcher::new(&options.config, store.clone())
        .await
        .spawn(options.reload_interval);

    let result = process_advertisements(scanner, &store, out).await;
    watcher.abort();
    result
}

/// Decode every advertisement from `scanner` and write displayable readings to `out`.
///
/// Each advertisement is decoded against one calibration snapshot. Rejected
/// advertisements, including unknown sensors, are only logged at debug level.
pub async fn process_advertisements(
    scanner: &dyn Scanner,
    store: &CalibrationStore,
    out: &mut dyn Write,
) -> Result<(), RunError> {
    let formatter = LogLineFormatter::new();
    let mut advertisements = scanner.start_scan().await?;

    while let Some(advertisement) = advertisements.recv().await {
        let calibration = store.snapshot();
        match dispatch(&advertisement, &calibration) {
            Ok(reading) => writeln!(out, "{}", formatter.format(&reading))?,
            Err(rejection) => debug!(
                "Ignoring advertisement from {}: {}",
                advertisement.address, rejection
            ),
        }
    }

    Ok(())
}
