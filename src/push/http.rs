//! HTTP push delivery.
//!
//! Each push is a JSON `POST` authenticated with the device token:
//!
//! ```text
//! POST /1/push HTTP/1.1
//! Authorization: Bearer <token>
//! Content-Type: application/json
//! Connection: close
//!
//! {"message": "...", "sender": "...", "channel": "..."}
//! ```

use super::{PushRequest, PushSender};
use crate::config::PushConfig;
use crate::error::TransportError;
use crate::telemetry::short_token;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{CONNECTION, HeaderValue};
use tracing::debug;

/// Sends pushes over HTTP(S).
pub struct HttpPushSender {
    client: reqwest::Client,
    default_endpoint: String,
}

impl HttpPushSender {
    /// Build a sender from configuration.
    pub fn new(config: &PushConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        debug!(
            default_endpoint = %config.default_endpoint,
            timeout_secs = config.timeout_secs,
            "HTTP push sender initialized"
        );

        Self {
            client,
            default_endpoint: config.default_endpoint.clone(),
        }
    }

    /// Resolve the URL a push goes to: the device's own endpoint, or the default.
    fn endpoint_for(&self, push: &PushRequest) -> Result<Url, TransportError> {
        let raw = push.endpoint.as_deref().unwrap_or(&self.default_endpoint);
        let url = Url::parse(raw).map_err(|_| TransportError::InvalidEndpoint(raw.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(TransportError::InvalidEndpoint(raw.to_string())),
        }
    }
}

#[async_trait]
impl PushSender for HttpPushSender {
    async fn send(&self, push: &PushRequest) -> Result<(), TransportError> {
        let url = self.endpoint_for(push)?;

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&push.token)
            .header(CONNECTION, HeaderValue::from_static("close"))
            .json(&push.notification)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        debug!(
            token = %short_token(&push.token),
            host = url.host_str().unwrap_or_default(),
            status = status.as_u16(),
            "Push delivered"
        );
        Ok(())
    }
}
