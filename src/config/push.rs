//! Push delivery configuration.

use serde::Deserialize;
use std::time::Duration;

use super::types::default_true;

/// Where and how pushes are delivered.
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    /// Deliver pushes at all. When false a no-op sender is installed.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Endpoint used for devices that never sent `SET PUSH-ENDPOINT`.
    #[serde(default = "default_endpoint")]
    pub default_endpoint: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User-Agent header sent with every push.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl PushConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_endpoint() -> String {
    "https://api.palaverapp.com/1/push".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("slircd-push/", env!("CARGO_PKG_VERSION")).to_string()
}
