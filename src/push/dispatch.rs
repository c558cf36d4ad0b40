//! Fire-and-forget push dispatch.

use super::{PushRequest, PushSender};
use crate::error::TransportError;
use crate::telemetry::{short_token, spans};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{Instrument, warn};

/// Spawns one task per push.
///
/// Failures are logged and dropped: pushes are best-effort and never retried.
#[derive(Clone)]
pub struct PushDispatcher {
    sender: Arc<dyn PushSender>,
}

impl PushDispatcher {
    pub fn new(sender: Arc<dyn PushSender>) -> Self {
        Self { sender }
    }

    /// Start delivering `push` in the background.
    ///
    /// Fails only when called outside a tokio runtime.
    pub fn dispatch(&self, push: PushRequest) -> Result<JoinHandle<()>, TransportError> {
        let handle = Handle::try_current().map_err(|_| TransportError::NoRuntime)?;
        let sender = Arc::clone(&self.sender);
        let span = spans::push(&push.token);

        Ok(handle.spawn(
            async move {
                if let Err(e) = sender.send(&push).await {
                    warn!(
                        token = %short_token(&push.token),
                        error = %e,
                        code = e.error_code(),
                        "Push delivery failed"
                    );
                }
            }
            .instrument(span),
        ))
    }
}
