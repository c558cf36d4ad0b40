//! The push engine: one registry, one router, one dispatcher.
//!
//! Construct a single [`PushEngine`] when the bouncer starts and share it
//! (behind an `Arc`) with every network session. Dropping it drops every device.

use crate::config::PushConfig;
use crate::error::AdminError;
use crate::handlers::{self, Caller, ClientEffect, DeviceListing, LineOutcome, PalaverCommand};
use crate::push::{HttpPushSender, NoopPushSender, PushDispatcher, PushSender};
use crate::router::{MessageEvent, NotificationRouter};
use crate::state::{ConnectionId, DeviceRegistry, NetworkRef};
use std::sync::Arc;
use tracing::info;

pub struct PushEngine {
    registry: Arc<DeviceRegistry>,
    router: NotificationRouter,
}

impl PushEngine {
    /// Build an engine delivering over HTTP, or discarding pushes when
    /// delivery is disabled.
    pub fn new(config: &PushConfig) -> Self {
        let sender: Arc<dyn PushSender> = if config.enabled {
            Arc::new(HttpPushSender::new(config))
        } else {
            info!("Push delivery disabled. Using no-op sender.");
            Arc::new(NoopPushSender)
        };
        Self::with_sender(sender)
    }

    /// Build an engine around a custom sender.
    pub fn with_sender(sender: Arc<dyn PushSender>) -> Self {
        let registry = Arc::new(DeviceRegistry::new());
        let router = NotificationRouter::new(Arc::clone(&registry), PushDispatcher::new(sender));
        Self { registry, router }
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    pub fn router(&self) -> &NotificationRouter {
        &self.router
    }

    // ------------------------------------------------------------------
    // Client protocol
    // ------------------------------------------------------------------

    /// Offer a raw client line. See [`handlers::handle_line`].
    pub fn handle_line(&self, caller: &Caller<'_>, line: &str) -> LineOutcome {
        handlers::handle_line(&self.registry, caller, line)
    }

    /// Apply an already parsed command.
    pub fn handle_command(&self, caller: &Caller<'_>, command: &PalaverCommand) -> Option<ClientEffect> {
        handlers::dispatch(&self.registry, caller, command)
    }

    /// A connection logged in to `network`.
    pub fn client_login(&self, conn: ConnectionId, network: &NetworkRef) {
        handlers::negotiation::login(&self.registry, conn, network);
    }

    /// A connection disconnected.
    pub fn client_disconnect(&self, conn: ConnectionId) {
        handlers::negotiation::disconnect(&self.registry, conn);
    }

    /// A network was deleted from the bouncer. Devices keep their other links.
    pub fn network_removed(&self, network: &NetworkRef) -> usize {
        self.registry.unlink_network_everywhere(network)
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    /// Route an incoming message. Returns the number of pushes dispatched.
    pub fn route_message(&self, event: &MessageEvent<'_>) -> usize {
        self.router.route_message(event)
    }

    // ------------------------------------------------------------------
    // Admin
    // ------------------------------------------------------------------

    /// Push an administrator announcement to every negotiated device.
    pub fn broadcast(&self, text: &str) -> usize {
        self.router.broadcast(text)
    }

    pub fn list_devices(&self, caller: &Caller<'_>) -> Result<DeviceListing, AdminError> {
        handlers::admin::list_devices(&self.registry, caller)
    }

    pub fn send_test_notification(&self, caller: &Caller<'_>) -> Result<usize, AdminError> {
        handlers::admin::test_notification(&self.router, caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_builds_noop_engine() {
        let config = PushConfig {
            enabled: false,
            ..PushConfig::default()
        };
        let engine = PushEngine::new(&config);
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn test_notification_needs_network() {
        let engine = PushEngine::new(&PushConfig::default());
        let caller = Caller {
            conn: ConnectionId::new_v4(),
            network: None,
            is_admin: true,
        };
        assert_eq!(
            engine.send_test_notification(&caller),
            Err(AdminError::NoNetwork)
        );
    }

    #[test]
    fn network_removed_leaves_devices_registered() {
        let engine = PushEngine::new(&PushConfig::default());
        let net = NetworkRef::new("alice", "libera");
        engine.registry().get_or_create("tok").lock().link_network(&net);

        assert_eq!(engine.network_removed(&net), 1);
        assert_eq!(engine.registry().len(), 1);
        assert!(engine.registry().devices_linked_to_network(&net).is_empty());
    }
}
