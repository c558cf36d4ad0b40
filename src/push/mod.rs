//! Push delivery abstraction.
//!
//! The router never talks to the network itself. It hands a [`PushRequest`] to
//! the [`PushDispatcher`], which runs the configured [`PushSender`] on its own
//! task so a slow push service can never hold up message routing.

use crate::error::TransportError;
use async_trait::async_trait;
use serde::Serialize;

mod dispatch;
pub mod http;
pub mod noop;

pub use dispatch::PushDispatcher;
pub use http::HttpPushSender;
pub use noop::NoopPushSender;

/// JSON body of a push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushNotification {
    /// App icon badge count.
    pub badge: u32,
    pub message: String,
    pub sender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// The client's identifier for the network, from `IDENTIFY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

impl PushNotification {
    /// A notification with a badge of one and no channel or network.
    pub fn new(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            badge: 1,
            message: message.into(),
            sender: sender.into(),
            channel: None,
            network: None,
        }
    }
}

/// One push, addressed to one device.
///
/// A snapshot: it holds no reference back into the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    /// Device token, sent as the bearer credential.
    pub token: String,
    /// Device-specific endpoint, if the device configured one.
    pub endpoint: Option<String>,
    pub notification: PushNotification,
}

/// Delivers pushes to an external service.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Deliver one push. Called from a spawned task; never retried.
    async fn send(&self, push: &PushRequest) -> Result<(), TransportError>;
}
