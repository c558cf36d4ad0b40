//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: The top-level [`Config`] and loading
//! - [`push`]: Push delivery configuration ([`PushConfig`])
//! - [`logging`]: Log filter and format ([`LoggingConfig`])

mod logging;
mod push;
mod types;

pub use logging::{LogFormat, LoggingConfig};
pub use push::PushConfig;
pub use types::{Config, ConfigError};
