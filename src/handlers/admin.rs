//! Administrative commands: device listing and test notifications.

use super::Caller;
use crate::error::AdminError;
use crate::router::NotificationRouter;
use crate::state::DeviceRegistry;
use tracing::info;

/// One row of the device listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRow {
    pub token: String,
    /// Empty for a device without linked networks.
    pub user: String,
    /// Empty for a device without linked networks.
    pub network: String,
    pub negotiating: bool,
}

/// Result of the `list` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceListing {
    /// One row per (device, user, network), or a single blank row for a
    /// device with nothing linked.
    pub rows: Vec<DeviceRow>,
    /// Token of the device the calling connection is attached to.
    pub caller_device: Option<String>,
}

impl DeviceListing {
    /// Status lines shown after the table.
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(2);
        if self.rows.is_empty() {
            lines.push("There are no devices registered with this server.".to_string());
        }
        lines.push(match &self.caller_device {
            Some(token) => format!("You are connected from Palaver. ({token})"),
            None => "You are not connected from a Palaver client.".to_string(),
        });
        lines
    }
}

/// List every registered device. Admins only.
pub fn list_devices(
    registry: &DeviceRegistry,
    caller: &Caller<'_>,
) -> Result<DeviceListing, AdminError> {
    if !caller.is_admin {
        return Err(AdminError::PermissionDenied);
    }

    let mut rows = Vec::new();
    for handle in registry.all() {
        let device = handle.lock();
        let negotiating = device.is_negotiating();
        let row = |user: &str, network: &str| DeviceRow {
            token: device.token().to_string(),
            user: user.to_string(),
            network: network.to_string(),
            negotiating,
        };

        if device.is_inert() {
            rows.push(row("", ""));
            continue;
        }
        for (user, networks) in device.networks() {
            rows.extend(networks.iter().map(|network| row(user, network)));
        }
    }

    let caller_device = registry
        .find_by_connection(caller.conn)
        .map(|handle| handle.lock().token().to_string());

    Ok(DeviceListing {
        rows,
        caller_device,
    })
}

/// Push a test notification to every device on the caller's network.
pub fn test_notification(
    router: &NotificationRouter,
    caller: &Caller<'_>,
) -> Result<usize, AdminError> {
    let network = caller.network.ok_or(AdminError::NoNetwork)?;
    let count = router.send_test_notification(network);
    info!(
        user = %network.user,
        network = %network.network,
        devices = count,
        "Test notification sent"
    );
    Ok(count)
}
