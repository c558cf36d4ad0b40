//! Unified error handling for slircd-push.
//!
//! None of these errors are fatal. Protocol errors are swallowed after logging,
//! transport errors are logged by the dispatcher, and admin errors carry the
//! text shown to the user.

use thiserror::Error;

// ============================================================================
// Handler Errors (PALAVER command processing)
// ============================================================================

/// Errors that can occur while handling a `PALAVER` command.
///
/// These never reach the client: the dispatcher logs them and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The command needs a device but the connection has not identified.
    #[error("connection has no device")]
    NoDevice,

    #[error("unknown key: {0}")]
    UnknownKey(String),

    #[error("empty value for {0}")]
    EmptyValue(String),

    #[error("not enough parameters for {0}")]
    NeedMoreParams(&'static str),

    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),
}

impl HandlerError {
    /// Get a static error code string for log labelling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoDevice => "no_device",
            Self::UnknownKey(_) => "unknown_key",
            Self::EmptyValue(_) => "empty_value",
            Self::NeedMoreParams(_) => "need_more_params",
            Self::UnknownSubcommand(_) => "unknown_subcommand",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult<T = ()> = Result<T, HandlerError>;

// ============================================================================
// Transport Errors (push delivery)
// ============================================================================

/// Push delivery failures.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("push service returned status {0}")]
    Status(u16),

    #[error("invalid push endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("no async runtime available to deliver push")]
    NoRuntime,
}

impl TransportError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Status(_) => "status",
            Self::InvalidEndpoint(_) => "invalid_endpoint",
            Self::NoRuntime => "no_runtime",
        }
    }
}

// ============================================================================
// Admin Errors (module commands)
// ============================================================================

/// Errors from the administrative surface. The Display text is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdminError {
    #[error("Permission denied")]
    PermissionDenied,

    #[error("You need to connect with a network.")]
    NoNetwork,
}
