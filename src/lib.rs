//! slircd-push - push notifications for bouncer clients.
//!
//! Clients register a *device* over the `PALAVER` extension, configure which
//! messages count as mentions, and receive an HTTP push for every mention that
//! arrives while they are not connected.
//!
//! The host bouncer owns the connections and feeds the engine:
//! - raw client lines → [`PushEngine::handle_line`]
//! - login and disconnect events → [`PushEngine::client_login`] / [`PushEngine::client_disconnect`]
//! - incoming chat messages → [`PushEngine::route_message`]

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod push;
pub mod router;
pub mod state;
pub mod telemetry;

pub use config::{Config, ConfigError};
pub use engine::PushEngine;
pub use error::{AdminError, HandlerError, TransportError};
pub use handlers::{Caller, ClientEffect, LineOutcome, PalaverCommand};
pub use push::{PushNotification, PushRequest, PushSender};
pub use router::MessageEvent;
pub use state::{ConnectionId, NetworkRef};
