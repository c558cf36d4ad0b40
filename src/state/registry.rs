//! Device registry.
//!
//! The DeviceRegistry owns every [`Device`] and maintains two indexes:
//! - Devices by token
//! - Connection ID to device token, for resolving the device a connection
//!   speaks for
//!
//! # Thread Safety
//!
//! Both indexes are DashMaps and each device sits behind its own mutex. The
//! lock order is: DashMap shard lock → Device mutex. A DashMap guard is always
//! dropped (by cloning the `Arc` out) before a device is locked, and at most one
//! device is locked at a time.

use super::device::{ConnectionId, Device, DeviceToken, NetworkRef};
use crate::telemetry::short_token;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared handle to a device.
pub type DeviceHandle = Arc<Mutex<Device>>;

/// Owns all devices for the lifetime of the engine.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: DashMap<DeviceToken, DeviceHandle>,
    connections: DashMap<ConnectionId, DeviceToken>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a device by token.
    pub fn get(&self, token: &str) -> Option<DeviceHandle> {
        self.devices.get(token).map(|d| Arc::clone(d.value()))
    }

    /// Get the device for `token`, creating it on first use.
    ///
    /// Concurrent callers with the same token all receive the same handle.
    pub fn get_or_create(&self, token: &str) -> DeviceHandle {
        if let Some(device) = self.get(token) {
            return device;
        }

        let entry = self.devices.entry(token.to_string()).or_insert_with(|| {
            info!(token = %short_token(token), "Registered new push device");
            Arc::new(Mutex::new(Device::new(token)))
        });
        Arc::clone(entry.value())
    }

    /// The device `conn` is attached to, if any.
    pub fn find_by_connection(&self, conn: ConnectionId) -> Option<DeviceHandle> {
        let token = self.connections.get(&conn).map(|t| t.value().clone())?;
        self.get(&token)
    }

    /// Attach `conn` to `device`, detaching it from any other device first.
    pub fn attach(&self, conn: ConnectionId, device: &DeviceHandle) {
        let token = device.lock().token().to_string();

        let previous = self.connections.insert(conn, token.clone());
        if let Some(previous) = previous.filter(|p| *p != token) {
            if let Some(old) = self.get(&previous) {
                old.lock().remove_connection(conn);
            }
            debug!(
                conn = %conn,
                from = %short_token(&previous),
                to = %short_token(&token),
                "Connection moved between devices"
            );
        }

        device.lock().add_connection(conn);
    }

    /// Detach `conn` from its device, returning the device it was attached to.
    pub fn detach(&self, conn: ConnectionId) -> Option<DeviceHandle> {
        let (_, token) = self.connections.remove(&conn)?;
        let device = self.get(&token)?;
        device.lock().remove_connection(conn);
        Some(device)
    }

    /// Devices with `network` linked.
    pub fn devices_linked_to_network(&self, network: &NetworkRef) -> Vec<DeviceHandle> {
        self.all()
            .into_iter()
            .filter(|device| device.lock().has_network(network))
            .collect()
    }

    /// Remove `network` from every device that links it. Returns how many
    /// devices were touched.
    pub fn unlink_network_everywhere(&self, network: &NetworkRef) -> usize {
        let count = self
            .all()
            .into_iter()
            .filter(|device| device.lock().unlink_network(network))
            .count();
        if count > 0 {
            info!(user = %network.user, network = %network.network, devices = count, "Unlinked network from devices");
        }
        count
    }

    /// Every device, ordered by token.
    pub fn all(&self) -> Vec<DeviceHandle> {
        let mut devices: Vec<(DeviceToken, DeviceHandle)> = self
            .devices
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect();
        devices.sort_by(|a, b| a.0.cmp(&b.0));
        devices.into_iter().map(|(_, device)| device).collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
