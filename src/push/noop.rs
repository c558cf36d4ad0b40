//! No-op push sender that discards every push.
//!
//! Installed when push delivery is disabled in configuration. Matching still
//! runs, so the logs show what would have been sent.

use super::{PushRequest, PushSender};
use crate::error::TransportError;
use crate::telemetry::short_token;
use async_trait::async_trait;
use tracing::debug;

pub struct NoopPushSender;

#[async_trait]
impl PushSender for NoopPushSender {
    async fn send(&self, push: &PushRequest) -> Result<(), TransportError> {
        debug!(
            token = %short_token(&push.token),
            sender = %push.notification.sender,
            "Push delivery disabled, dropping notification"
        );
        Ok(())
    }
}
