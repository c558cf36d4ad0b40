//! Device negotiation.
//!
//! A device is either `Idle` or `Negotiating`. A client announces its device
//! with IDENTIFY; if the stored configuration is stale the bouncer asks it to
//! renegotiate, and the client replays its whole configuration between BEGIN
//! and END:
//!
//! ```text
//! C: PALAVER IDENTIFY <token> <version> [<network-id>]
//! S: PALAVER REQ *                        (only if Idle and version differs)
//! C: PALAVER BEGIN <token> <version>
//! C: PALAVER SET PUSH-ENDPOINT <url>
//! C: PALAVER ADD MENTION-KEYWORD {nick}
//! C: PALAVER END
//! ```

use super::{Caller, ClientEffect};
use super::command::SettingKey;
use crate::error::{HandlerError, HandlerResult};
use crate::state::{ConnectionId, DeviceHandle, DeviceRegistry, FilterKind, NetworkRef};
use crate::telemetry::short_token;
use tracing::{debug, info};

/// `IDENTIFY <token> <version> [<network-id>]`
///
/// The network id is the client's own name for the caller's network. It is
/// echoed in pushes so the client can open the right conversation.
pub fn identify(
    registry: &DeviceRegistry,
    caller: &Caller<'_>,
    token: &str,
    version: &str,
    network_id: Option<&str>,
) -> HandlerResult<Option<ClientEffect>> {
    registry.detach(caller.conn);

    let handle = registry.get_or_create(token);
    let renegotiate = {
        let mut device = handle.lock();
        let stale = device.needs_renegotiation(version);
        if stale {
            device.begin_negotiation();
        }
        if let Some(network) = caller.network {
            device.link_network(network);
            if let Some(id) = network_id {
                device.set_network_id(network, id);
            }
        }
        stale
    };
    registry.attach(caller.conn, &handle);

    if renegotiate {
        info!(token = %short_token(token), version = %version, "Requesting device renegotiation");
    }
    Ok(renegotiate.then_some(ClientEffect::Renegotiate))
}

/// `BEGIN <token> <version>`: wipe the device and start collecting its
/// configuration again.
pub fn begin(
    registry: &DeviceRegistry,
    caller: &Caller<'_>,
    token: &str,
    version: &str,
) -> HandlerResult<Option<ClientEffect>> {
    let handle = registry.get_or_create(token);
    {
        let mut device = handle.lock();
        let network_id = caller
            .network
            .and_then(|network| device.network_id(network))
            .map(str::to_string);
        device.reset();
        device.begin_negotiation();
        device.set_version(version);
        // The reset dropped every link; keep the one this connection speaks for.
        if let Some(network) = caller.network {
            device.link_network(network);
            if let Some(id) = network_id {
                device.set_network_id(network, id);
            }
        }
    }
    registry.attach(caller.conn, &handle);

    debug!(token = %short_token(token), version = %version, "Device negotiation started");
    Ok(None)
}

/// `END`
pub fn end(registry: &DeviceRegistry, caller: &Caller<'_>) -> HandlerResult<Option<ClientEffect>> {
    let handle = device_for(registry, caller.conn)?;
    let mut device = handle.lock();
    device.end_negotiation();
    debug!(token = %short_token(device.token()), "Device negotiation finished");
    Ok(None)
}

/// `SET <key> <value>`
pub fn set(
    registry: &DeviceRegistry,
    caller: &Caller<'_>,
    key: &str,
    value: &str,
) -> HandlerResult<Option<ClientEffect>> {
    let handle = device_for(registry, caller.conn)?;
    let setting = SettingKey::from_key(key).ok_or_else(|| HandlerError::UnknownKey(key.to_string()))?;

    let mut device = handle.lock();
    match setting {
        SettingKey::Version => device.set_version(value),
        SettingKey::PushEndpoint => device.set_push_endpoint(value),
    }
    Ok(None)
}

/// `ADD <key> <value>`
pub fn add(
    registry: &DeviceRegistry,
    caller: &Caller<'_>,
    key: &str,
    value: &str,
) -> HandlerResult<Option<ClientEffect>> {
    let handle = device_for(registry, caller.conn)?;
    let kind = FilterKind::from_key(key).ok_or_else(|| HandlerError::UnknownKey(key.to_string()))?;
    // An empty filter would match every message.
    if value.is_empty() {
        return Err(HandlerError::EmptyValue(kind.key().to_string()));
    }

    handle.lock().add_filter(kind, value);
    Ok(None)
}

/// A connection finished logging in to `network`.
pub fn login(registry: &DeviceRegistry, conn: ConnectionId, network: &NetworkRef) {
    if let Some(handle) = registry.find_by_connection(conn) {
        let mut device = handle.lock();
        if device.link_network(network) {
            debug!(
                token = %short_token(device.token()),
                user = %network.user,
                network = %network.network,
                "Linked network to device"
            );
        }
    }
}

/// A connection went away. Its device stops negotiating.
pub fn disconnect(registry: &DeviceRegistry, conn: ConnectionId) {
    if let Some(handle) = registry.detach(conn) {
        handle.lock().end_negotiation();
    }
}

fn device_for(registry: &DeviceRegistry, conn: ConnectionId) -> HandlerResult<DeviceHandle> {
    registry.find_by_connection(conn).ok_or(HandlerError::NoDevice)
}
