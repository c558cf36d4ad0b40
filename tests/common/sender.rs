//! Push sender that records pushes instead of delivering them.

use async_trait::async_trait;
use slircd_push::{PushRequest, PushSender, TransportError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Forwards every push to a channel the test can read.
pub struct RecordingSender {
    tx: mpsc::UnboundedSender<PushRequest>,
    fail: bool,
}

/// Receiving side of a [`RecordingSender`].
pub struct Recorded {
    rx: mpsc::UnboundedReceiver<PushRequest>,
}

#[allow(dead_code)]
impl RecordingSender {
    pub fn new() -> (Arc<Self>, Recorded) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx, fail: false }), Recorded { rx })
    }

    /// Records pushes but reports every delivery as failed.
    pub fn failing() -> (Arc<Self>, Recorded) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx, fail: true }), Recorded { rx })
    }
}

#[async_trait]
impl PushSender for RecordingSender {
    async fn send(&self, push: &PushRequest) -> Result<(), TransportError> {
        let _ = self.tx.send(push.clone());
        if self.fail {
            return Err(TransportError::Status(500));
        }
        Ok(())
    }
}

#[allow(dead_code)]
impl Recorded {
    /// Wait for the next push.
    pub async fn next(&mut self) -> PushRequest {
        tokio::time::timeout(Duration::from_secs(2), self.rx.recv())
            .await
            .expect("timed out waiting for push")
            .expect("sender dropped")
    }

    /// Assert nothing else arrives within a short grace period.
    pub async fn assert_idle(&mut self) {
        let extra = tokio::time::timeout(Duration::from_millis(100), self.rx.recv()).await;
        assert!(extra.is_err(), "unexpected push: {:?}", extra);
    }
}
