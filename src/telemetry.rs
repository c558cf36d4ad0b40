//! Tracing setup and span helpers.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter. Returns an error if a global
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
    }
}

/// Shorten a device token for logging.
///
/// Tokens double as bearer credentials for the push service, so only a prefix
/// is ever logged.
pub fn short_token(token: &str) -> &str {
    match token.char_indices().nth(8) {
        Some((end, _)) => &token[..end],
        None => token,
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span for a client connection speaking the PALAVER protocol.
    pub fn connection(conn: &uuid::Uuid) -> Span {
        info_span!("connection", conn = %conn)
    }

    /// Span for routing one message on a network.
    pub fn route(user: &str, network: &str) -> Span {
        debug_span!("route", user = %user, network = %network)
    }

    /// Span for a single push delivery.
    pub fn push(token: &str) -> Span {
        info_span!("push", token = %super::short_token(token))
    }
}
