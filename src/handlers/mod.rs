//! PALAVER command handlers.
//!
//! Handlers never fail visibly: a command that cannot be applied (no device
//! yet, unknown key, malformed line) is logged at debug level and dropped.

pub mod admin;
pub mod command;
pub mod negotiation;

pub use admin::{DeviceListing, DeviceRow};
pub use command::{
    PALAVER_CAPABILITY, PALAVER_COMMAND, PalaverCommand, RENEGOTIATE_REQUEST, SettingKey,
};

use crate::error::HandlerResult;
use crate::state::{ConnectionId, DeviceRegistry, NetworkRef};
use crate::telemetry::spans;
use tracing::debug;

/// The connection a command arrived on.
#[derive(Debug, Clone)]
pub struct Caller<'a> {
    pub conn: ConnectionId,
    /// The bouncer network this connection is logged in to, if any.
    pub network: Option<&'a NetworkRef>,
    /// Whether the connection's user is a bouncer administrator.
    pub is_admin: bool,
}

/// Something the host must do to the calling connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEffect {
    /// Send [`RENEGOTIATE_REQUEST`] to the connection.
    Renegotiate,
    /// Mark the connection away (client backgrounded) or back.
    SetAway(bool),
}

impl ClientEffect {
    /// The protocol line to send, if the effect is a line.
    pub fn line(self) -> Option<&'static str> {
        match self {
            Self::Renegotiate => Some(RENEGOTIATE_REQUEST),
            Self::SetAway(_) => None,
        }
    }
}

/// Outcome of offering a raw client line to the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Not a PALAVER line; the host should process it normally.
    Continue,
    /// Consumed. The host must apply the effect, if any, and not forward the line.
    Handled(Option<ClientEffect>),
}

/// Offer a raw client line.
pub fn handle_line(registry: &DeviceRegistry, caller: &Caller<'_>, line: &str) -> LineOutcome {
    let Some(parsed) = PalaverCommand::parse(line) else {
        return LineOutcome::Continue;
    };

    let _span = spans::connection(&caller.conn).entered();
    match parsed {
        Ok(command) => LineOutcome::Handled(dispatch(registry, caller, &command)),
        Err(e) => {
            debug!(conn = %caller.conn, error = %e, code = e.error_code(), "Malformed PALAVER line");
            LineOutcome::Handled(None)
        }
    }
}

/// Apply a parsed command.
pub fn dispatch(
    registry: &DeviceRegistry,
    caller: &Caller<'_>,
    command: &PalaverCommand,
) -> Option<ClientEffect> {
    let result: HandlerResult<Option<ClientEffect>> = match command {
        PalaverCommand::Identify {
            token,
            version,
            network_id,
        } => negotiation::identify(registry, caller, token, version, network_id.as_deref()),
        PalaverCommand::Begin { token, version } => {
            negotiation::begin(registry, caller, token, version)
        }
        PalaverCommand::End => negotiation::end(registry, caller),
        PalaverCommand::Set { key, value } => negotiation::set(registry, caller, key, value),
        PalaverCommand::Add { key, value } => negotiation::add(registry, caller, key, value),
        PalaverCommand::Background => Ok(Some(ClientEffect::SetAway(true))),
        PalaverCommand::Foreground => Ok(Some(ClientEffect::SetAway(false))),
    };

    result.unwrap_or_else(|e| {
        debug!(
            conn = %caller.conn,
            command = command.name(),
            error = %e,
            code = e.error_code(),
            "PALAVER command ignored"
        );
        None
    })
}
