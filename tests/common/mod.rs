//! Integration test common infrastructure.
//!
//! Provides a recording push sender, a fake HTTP push service, and helpers for
//! driving a device through negotiation.

pub mod push_service;
pub mod sender;

#[allow(unused_imports)]
pub use push_service::{FakePushService, ReceivedPush};
#[allow(unused_imports)]
pub use sender::RecordingSender;

use slircd_push::{Caller, ConnectionId, LineOutcome, NetworkRef, PushEngine};

/// A client connection talking to the engine.
#[allow(dead_code)]
pub struct TestConnection {
    pub conn: ConnectionId,
    pub network: Option<NetworkRef>,
}

#[allow(dead_code)]
impl TestConnection {
    /// A connection logged in to `user`/`network`.
    pub fn on_network(user: &str, network: &str) -> Self {
        Self {
            conn: ConnectionId::new_v4(),
            network: Some(NetworkRef::new(user, network)),
        }
    }

    /// A connection not attached to any network.
    pub fn detached() -> Self {
        Self {
            conn: ConnectionId::new_v4(),
            network: None,
        }
    }

    pub fn caller(&self) -> Caller<'_> {
        Caller {
            conn: self.conn,
            network: self.network.as_ref(),
            is_admin: false,
        }
    }

    /// Send raw lines, returning each outcome.
    pub fn send(&self, engine: &PushEngine, lines: &[&str]) -> Vec<LineOutcome> {
        lines
            .iter()
            .map(|line| engine.handle_line(&self.caller(), line))
            .collect()
    }
}
