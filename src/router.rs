//! Message routing: decides which devices get a push for an incoming message.

use crate::push::{PushDispatcher, PushNotification, PushRequest};
use crate::state::{Device, DeviceRegistry, MessageView, NetworkRef};
use crate::telemetry::{short_token, spans};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sender name used for test notifications.
pub const TEST_SENDER: &str = "palaver";
/// Message text used for test notifications.
pub const TEST_MESSAGE: &str = "Test notification";
/// Sender name used for administrator broadcasts.
pub const BROADCAST_SENDER: &str = "ZNC Admin";

/// A chat message that arrived on a bouncer network.
#[derive(Debug, Clone)]
pub struct MessageEvent<'a> {
    /// Bouncer user and network the message arrived on.
    pub network: &'a NetworkRef,
    /// Our own nickname on that network.
    pub self_nick: &'a str,
    pub sender: &'a str,
    pub text: &'a str,
    /// `None` for a private message.
    pub channel: Option<&'a str>,
    /// Whether the user has a live client attached to the network. Supplied by
    /// the session layer; nothing is pushed while the user is watching.
    pub user_online: bool,
}

impl<'a> MessageEvent<'a> {
    fn view(&self) -> MessageView<'a> {
        MessageView {
            text: self.text,
            sender: self.sender,
            channel: self.channel,
            self_nick: self.self_nick,
        }
    }
}

/// Routes messages to devices and dispatches pushes.
#[derive(Clone)]
pub struct NotificationRouter {
    registry: Arc<DeviceRegistry>,
    dispatcher: PushDispatcher,
}

impl NotificationRouter {
    pub fn new(registry: Arc<DeviceRegistry>, dispatcher: PushDispatcher) -> Self {
        Self {
            registry,
            dispatcher,
        }
    }

    /// Evaluate every device linked to the message's network and push to each
    /// one that matches. Returns the number of pushes dispatched.
    pub fn route_message(&self, event: &MessageEvent<'_>) -> usize {
        if event.user_online {
            return 0;
        }

        let _span = spans::route(&event.network.user, &event.network.network).entered();
        let view = event.view();

        let pushes: Vec<PushRequest> = self
            .registry
            .devices_linked_to_network(event.network)
            .into_iter()
            .filter_map(|handle| {
                let device = handle.lock();
                if !device.wants(event.network, &view) {
                    return None;
                }
                let push = push_for(&device, event.network, event.sender, event.text, event.channel);
                Some(push)
            })
            .collect();

        let dispatched = self.dispatch_all(pushes);
        if dispatched > 0 {
            debug!(
                sender = %event.sender,
                channel = event.channel.unwrap_or_default(),
                pushes = dispatched,
                "Routed mention"
            );
        }
        dispatched
    }

    /// Push a test notification to every device linked to `network`,
    /// regardless of filters. Returns the number of devices notified.
    pub fn send_test_notification(&self, network: &NetworkRef) -> usize {
        let pushes: Vec<PushRequest> = self
            .registry
            .devices_linked_to_network(network)
            .into_iter()
            .map(|handle| {
                let device = handle.lock();
                push_for(&device, network, TEST_SENDER, TEST_MESSAGE, None)
            })
            .collect();
        self.dispatch_all(pushes)
    }

    /// Push `text` to every device that has negotiated, whether or not any
    /// of its connections are still around. Filters and links are not
    /// consulted. Returns the number of devices notified.
    pub fn broadcast(&self, text: &str) -> usize {
        let pushes: Vec<PushRequest> = self
            .registry
            .all()
            .into_iter()
            .filter_map(|handle| {
                let device = handle.lock();
                if !device.has_negotiated() {
                    return None;
                }
                Some(PushRequest {
                    token: device.token().to_string(),
                    endpoint: device.push_endpoint().map(str::to_string),
                    notification: PushNotification::new(BROADCAST_SENDER, text),
                })
            })
            .collect();

        let dispatched = self.dispatch_all(pushes);
        info!(devices = dispatched, "Broadcast pushed");
        dispatched
    }

    /// Dispatch outside of any device lock.
    fn dispatch_all(&self, pushes: Vec<PushRequest>) -> usize {
        let mut dispatched = 0;
        for push in pushes {
            let token = push.token.clone();
            match self.dispatcher.dispatch(push) {
                Ok(_) => dispatched += 1,
                Err(e) => warn!(token = %short_token(&token), error = %e, "Push not dispatched"),
            }
        }
        dispatched
    }
}

fn push_for(
    device: &Device,
    network: &NetworkRef,
    sender: &str,
    text: &str,
    channel: Option<&str>,
) -> PushRequest {
    PushRequest {
        token: device.token().to_string(),
        endpoint: device.push_endpoint().map(str::to_string),
        notification: PushNotification {
            channel: channel.map(str::to_string),
            network: device.network_id(network).map(str::to_string),
            ..PushNotification::new(sender, text)
        },
    }
}
