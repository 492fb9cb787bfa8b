//! BlueZ D-Bus backend for ThermoBeacon scanning.
//!
//! This backend uses the `bluer` crate to communicate with the BlueZ daemon
//! via D-Bus. It requires the `bluetoothd` daemon to be running.

use super::{ADVERTISEMENT_CHANNEL_BUFFER_SIZE, COMPLETE_LOCAL_NAME_TYPE, ScanError};
use crate::dispatch::{Advertisement, BROADCAST_NAME};
use bluer::monitor::{Monitor, MonitorEvent, Pattern};
use bluer::{Adapter, Address, Device, DeviceEvent, DeviceProperty, Session};
use futures::{StreamExt, pin_mut};
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

impl From<bluer::Error> for ScanError {
    fn from(err: bluer::Error) -> Self {
        ScanError::Bluetooth(err.to_string())
    }
}

/// Start scanning for ThermoBeacon devices using the BlueZ D-Bus backend.
///
/// Powers on the default adapter and registers an advertisement monitor
/// matching the ThermoBeacon local name. Every manufacturer-data update of a
/// found device is sent through the returned channel. Runs indefinitely.
pub async fn start_scan() -> Result<mpsc::Receiver<Advertisement>, ScanError> {
    let session = Session::new().await?;
    let adapter = session.default_adapter().await?;
    adapter.set_powered(true).await?;
    info!("Scanning on adapter {}", adapter.name());

    let (tx, rx) = mpsc::channel(ADVERTISEMENT_CHANNEL_BUFFER_SIZE);

    let pattern = Pattern {
        data_type: COMPLETE_LOCAL_NAME_TYPE,
        start_position: 0,
        content: BROADCAST_NAME.as_bytes().to_vec(),
    };

    let monitor_manager = adapter.monitor().await?;
    let mut monitor_handle = monitor_manager
        .register(Monitor {
            patterns: Some(vec![pattern]),
            ..Default::default()
        })
        .await?;

    // Spawn a task that owns all Bluetooth state and runs the event loop
    tokio::spawn(async move {
        // Keep all Bluetooth state alive by moving it into this task
        let _session = session;
        let _monitor_manager = monitor_manager;
        let mut watched: HashMap<Address, JoinHandle<()>> = HashMap::new();

        while let Some(event) = monitor_handle.next().await {
            match event {
                MonitorEvent::DeviceFound(device_id) => {
                    let address = device_id.device;
                    if watched.get(&address).is_some_and(|task| !task.is_finished()) {
                        continue;
                    }
                    debug!("Found ThermoBeacon {}", address);
                    let task = tokio::spawn(watch_device(adapter.clone(), address, tx.clone()));
                    watched.insert(address, task);
                }
                MonitorEvent::DeviceLost(device_id) => {
                    debug!("Lost ThermoBeacon {}", device_id.device);
                    if let Some(task) = watched.remove(&device_id.device) {
                        task.abort();
                    }
                }
                _ => {}
            }
            if tx.is_closed() {
                break;
            }
        }

        for (_, task) in watched {
            task.abort();
        }
    });

    Ok(rx)
}

/// Forward the current and every subsequent manufacturer-data update of a device.
async fn watch_device(adapter: Adapter, address: Address, tx: mpsc::Sender<Advertisement>) {
    if let Err(e) = forward_updates(&adapter, address, &tx).await {
        debug!("Stopped watching {}: {}", address, e);
    }
}

async fn forward_updates(
    adapter: &Adapter,
    address: Address,
    tx: &mpsc::Sender<Advertisement>,
) -> Result<(), ScanError> {
    let device = adapter.device(address)?;

    if let Some(data) = device.manufacturer_data().await? {
        send(&device, data, tx).await?;
    }

    let events = device.events().await?;
    pin_mut!(events);

    while let Some(DeviceEvent::PropertyChanged(property)) = events.next().await {
        if let DeviceProperty::ManufacturerData(data) = property {
            send(&device, data, tx).await?;
        }
    }

    Ok(())
}

async fn send(
    device: &Device,
    manufacturer_data: HashMap<u16, Vec<u8>>,
    tx: &mpsc::Sender<Advertisement>,
) -> Result<(), ScanError> {
    let advertisement = Advertisement {
        address: device.address().into(),
        local_name: device.name().await?,
        manufacturer_data: manufacturer_data.into_iter().collect::<BTreeMap<_, _>>(),
        rssi: device.rssi().await?.unwrap_or_default(),
    };

    tx.send(advertisement)
        .await
        .map_err(|_| ScanError::Bluetooth("advertisement receiver dropped".to_string()))
}
